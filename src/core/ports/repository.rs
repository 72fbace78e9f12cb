use crate::core::models::{
    choice::{Choice, Insert as ChoiceInsert, Query as ChoiceQuery},
    question::{Insert as QuestionInsert, Query as QuestionQuery, Question},
    user::{Insert as UserInsert, User},
    vote::{Insert as VoteInsert, Query as VoteQuery, Vote},
};
use crate::error::Error;

pub trait QuestionCommon {
    async fn insert(&mut self, data: QuestionInsert) -> Result<i32, Error>;
    /// Newest `pub_date` first.
    async fn query(&mut self, query: &QuestionQuery) -> Result<Vec<Question>, Error>;
    async fn get(&mut self, id: i32) -> Result<Option<Question>, Error>;
    /// Removes the question together with its choices and votes.
    async fn delete(&mut self, id: i32) -> Result<bool, Error>;
}

pub trait ChoiceCommon {
    async fn insert(&mut self, data: ChoiceInsert) -> Result<i32, Error>;
    async fn query(&mut self, query: &ChoiceQuery) -> Result<Vec<Choice>, Error>;
    /// Only returns the choice if it belongs to `question_id`.
    async fn get(&mut self, question_id: i32, id: i32) -> Result<Option<Choice>, Error>;
    async fn add_votes(&mut self, id: i32, delta: i32) -> Result<(), Error>;
}

pub trait VoteCommon {
    async fn insert(&mut self, data: VoteInsert) -> Result<i32, Error>;
    async fn query(&mut self, query: &VoteQuery) -> Result<Vec<Vote>, Error>;
    async fn get(&mut self, question_id: i32, user_id: i32) -> Result<Option<Vote>, Error>;
    async fn update_choice(&mut self, id: i32, choice_id: i32) -> Result<(), Error>;
}

pub trait UserCommon {
    async fn insert(&mut self, data: UserInsert) -> Result<i32, Error>;
    async fn get(&mut self, id: i32) -> Result<Option<User>, Error>;
    async fn get_by_username(&mut self, username: &str) -> Result<Option<User>, Error>;
    /// Serializes writes made on behalf of one user until the surrounding transaction ends.
    async fn lock(&mut self, id: i32) -> Result<(), Error>;
}

pub trait Common: QuestionCommon + ChoiceCommon + VoteCommon + UserCommon {}

pub trait Store: Common {}

pub trait TxStore: Store {
    async fn commit(self) -> Result<(), Error>;
    async fn rollback(self) -> Result<(), Error>;
}

pub trait Manager {
    type Store: Store;
    type TxStore: TxStore;

    async fn db(&self) -> Result<Self::Store, Error>;
    async fn tx(&self) -> Result<Self::TxStore, Error>;
}
