use crate::core::models::{
    choice::{Choice, Insert as ChoiceInsert, Query as ChoiceQuery},
    question::{Insert as QuestionInsert, Query as QuestionQuery, Question},
    user::{Insert as UserInsert, User},
    vote::{Insert as VoteInsert, Query as VoteQuery, Vote},
};
use crate::core::ports::repository::{ChoiceCommon, Common, Manager, QuestionCommon, Store, TxStore, UserCommon, VoteCommon};
use crate::error::Error;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

#[derive(Debug, Default, Clone)]
struct Tables {
    seq: i32,
    questions: BTreeMap<i32, Question>,
    choices: BTreeMap<i32, Choice>,
    votes: BTreeMap<i32, Vote>,
    users: BTreeMap<i32, User>,
}

impl Tables {
    fn next_id(&mut self) -> i32 {
        self.seq += 1;
        self.seq
    }
}

/// Keeps every table in process memory. Each handle owns the lock for as long
/// as it lives, so handles never interleave.
#[derive(Debug, Default, Clone)]
pub struct MemoryManager {
    tables: Arc<Mutex<Tables>>,
}

pub struct Memory {
    guard: OwnedMutexGuard<Tables>,
    // Writes of an open transaction; published on commit.
    staged: Option<Tables>,
}

impl Memory {
    fn tables(&mut self) -> &mut Tables {
        match self.staged {
            Some(ref mut t) => t,
            None => &mut *self.guard,
        }
    }
}

impl QuestionCommon for Memory {
    async fn insert(&mut self, data: QuestionInsert) -> Result<i32, Error> {
        let t = self.tables();
        let id = t.next_id();
        t.questions.insert(
            id,
            Question {
                id,
                question_text: data.question_text,
                pub_date: data.pub_date,
                end_date: data.end_date,
            },
        );
        Ok(id)
    }

    async fn query(&mut self, query: &QuestionQuery) -> Result<Vec<Question>, Error> {
        let mut questions: Vec<Question> = self
            .tables()
            .questions
            .values()
            .filter(|q| query.pub_date_lte.map_or(true, |lte| q.pub_date <= lte))
            .cloned()
            .collect();
        questions.sort_by(|a, b| b.pub_date.cmp(&a.pub_date).then(b.id.cmp(&a.id)));
        Ok(questions)
    }

    async fn get(&mut self, id: i32) -> Result<Option<Question>, Error> {
        Ok(self.tables().questions.get(&id).cloned())
    }

    async fn delete(&mut self, id: i32) -> Result<bool, Error> {
        let t = self.tables();
        if t.questions.remove(&id).is_none() {
            return Ok(false);
        }
        t.choices.retain(|_, c| c.question_id != id);
        t.votes.retain(|_, v| v.question_id != id);
        Ok(true)
    }
}

impl ChoiceCommon for Memory {
    async fn insert(&mut self, data: ChoiceInsert) -> Result<i32, Error> {
        let t = self.tables();
        if !t.questions.contains_key(&data.question_id) {
            return Err(Error::NotFound(format!("question {}", data.question_id)));
        }
        let id = t.next_id();
        t.choices.insert(
            id,
            Choice {
                id,
                question_id: data.question_id,
                choice_text: data.choice_text,
                votes: 0,
            },
        );
        Ok(id)
    }

    async fn query(&mut self, query: &ChoiceQuery) -> Result<Vec<Choice>, Error> {
        Ok(self
            .tables()
            .choices
            .values()
            .filter(|c| query.question_id_eq.map_or(true, |qid| c.question_id == qid))
            .cloned()
            .collect())
    }

    async fn get(&mut self, question_id: i32, id: i32) -> Result<Option<Choice>, Error> {
        Ok(self.tables().choices.get(&id).filter(|c| c.question_id == question_id).cloned())
    }

    async fn add_votes(&mut self, id: i32, delta: i32) -> Result<(), Error> {
        let choice = self.tables().choices.get_mut(&id).ok_or_else(|| Error::NotFound(format!("choice {}", id)))?;
        let votes = choice.votes + delta;
        if votes < 0 {
            return Err(Error::ServerError(format!("tally of choice {} would become negative", id)));
        }
        choice.votes = votes;
        Ok(())
    }
}

impl VoteCommon for Memory {
    async fn insert(&mut self, data: VoteInsert) -> Result<i32, Error> {
        let t = self.tables();
        if t.votes.values().any(|v| v.question_id == data.question_id && v.user_id == data.user_id) {
            return Err(Error::BusinessError(format!("user {} already voted on question {}", data.user_id, data.question_id)));
        }
        let id = t.next_id();
        t.votes.insert(
            id,
            Vote {
                id,
                question_id: data.question_id,
                user_id: data.user_id,
                choice_id: data.choice_id,
            },
        );
        Ok(id)
    }

    async fn query(&mut self, query: &VoteQuery) -> Result<Vec<Vote>, Error> {
        Ok(self
            .tables()
            .votes
            .values()
            .filter(|v| query.user_id_eq.map_or(true, |uid| v.user_id == uid))
            .filter(|v| query.question_id_eq.map_or(true, |qid| v.question_id == qid))
            .cloned()
            .collect())
    }

    async fn get(&mut self, question_id: i32, user_id: i32) -> Result<Option<Vote>, Error> {
        Ok(self.tables().votes.values().find(|v| v.question_id == question_id && v.user_id == user_id).cloned())
    }

    async fn update_choice(&mut self, id: i32, choice_id: i32) -> Result<(), Error> {
        let vote = self.tables().votes.get_mut(&id).ok_or_else(|| Error::NotFound(format!("vote {}", id)))?;
        vote.choice_id = choice_id;
        Ok(())
    }
}

impl UserCommon for Memory {
    async fn insert(&mut self, data: UserInsert) -> Result<i32, Error> {
        let t = self.tables();
        if t.users.values().any(|u| u.username == data.username) {
            return Err(Error::UsernameTaken(data.username));
        }
        let id = t.next_id();
        t.users.insert(
            id,
            User {
                id,
                username: data.username,
                password: data.password,
                salt: data.salt,
                is_staff: data.is_staff,
            },
        );
        Ok(id)
    }

    async fn get(&mut self, id: i32) -> Result<Option<User>, Error> {
        Ok(self.tables().users.get(&id).cloned())
    }

    async fn get_by_username(&mut self, username: &str) -> Result<Option<User>, Error> {
        Ok(self.tables().users.values().find(|u| u.username == username).cloned())
    }

    // The handle already holds the only lock there is.
    async fn lock(&mut self, id: i32) -> Result<(), Error> {
        if self.tables().users.contains_key(&id) {
            Ok(())
        } else {
            Err(Error::Unauthorized)
        }
    }
}

impl Common for Memory {}
impl Store for Memory {}

impl TxStore for Memory {
    async fn commit(mut self) -> Result<(), Error> {
        if let Some(staged) = self.staged.take() {
            *self.guard = staged;
        }
        Ok(())
    }

    async fn rollback(self) -> Result<(), Error> {
        Ok(())
    }
}

impl Manager for MemoryManager {
    type Store = Memory;
    type TxStore = Memory;

    async fn db(&self) -> Result<Self::Store, Error> {
        let guard = self.tables.clone().lock_owned().await;
        Ok(Memory { guard, staged: None })
    }

    async fn tx(&self) -> Result<Self::TxStore, Error> {
        let guard = self.tables.clone().lock_owned().await;
        let staged = Some((*guard).clone());
        Ok(Memory { guard, staged })
    }
}
