use crate::core::models::{
    choice::{Choice, Insert as ChoiceInsert, Query as ChoiceQuery},
    question::{Insert as QuestionInsert, Query as QuestionQuery, Question},
    user::{Insert as UserInsert, User},
    vote::{Insert as VoteInsert, Query as VoteQuery, Vote},
};
use crate::core::ports::repository::{ChoiceCommon, Common, Manager, QuestionCommon, Store, TxStore, UserCommon, VoteCommon};
use crate::error::Error;
use sqlx::pool::PoolConnection;
use sqlx::postgres::PgPoolOptions;
use sqlx::{query, query_as, query_scalar, PgConnection, PgPool, Postgres, QueryBuilder, Transaction};
use std::ops::DerefMut;

pub struct PgSqlx<E>
where
    E: DerefMut<Target = PgConnection>,
{
    executor: E,
}

impl<E> PgSqlx<E>
where
    E: DerefMut<Target = PgConnection>,
{
    pub fn new(executor: E) -> Self {
        Self { executor }
    }
}

impl<E> QuestionCommon for PgSqlx<E>
where
    E: DerefMut<Target = PgConnection>,
{
    async fn insert(&mut self, data: QuestionInsert) -> Result<i32, Error> {
        let id = query_scalar("INSERT INTO questions (question_text, pub_date, end_date) VALUES ($1, $2, $3) RETURNING id")
            .bind(data.question_text)
            .bind(data.pub_date)
            .bind(data.end_date)
            .fetch_one(&mut *self.executor)
            .await?;
        Ok(id)
    }

    async fn query(&mut self, query: &QuestionQuery) -> Result<Vec<Question>, Error> {
        let mut stmt = QueryBuilder::<Postgres>::new("SELECT id, question_text, pub_date, end_date FROM questions WHERE 1 = 1");
        if let Some(lte) = query.pub_date_lte {
            stmt.push(" AND pub_date <= ").push_bind(lte);
        }
        stmt.push(" ORDER BY pub_date DESC, id DESC");
        let questions = stmt.build_query_as().fetch_all(&mut *self.executor).await?;
        Ok(questions)
    }

    async fn get(&mut self, id: i32) -> Result<Option<Question>, Error> {
        let question = query_as("SELECT id, question_text, pub_date, end_date FROM questions WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.executor)
            .await?;
        Ok(question)
    }

    async fn delete(&mut self, id: i32) -> Result<bool, Error> {
        let res = query("DELETE FROM questions WHERE id = $1").bind(id).execute(&mut *self.executor).await?;
        Ok(res.rows_affected() > 0)
    }
}

impl<E> ChoiceCommon for PgSqlx<E>
where
    E: DerefMut<Target = PgConnection>,
{
    async fn insert(&mut self, data: ChoiceInsert) -> Result<i32, Error> {
        let id = query_scalar("INSERT INTO choices (question_id, choice_text) VALUES ($1, $2) RETURNING id")
            .bind(data.question_id)
            .bind(data.choice_text)
            .fetch_one(&mut *self.executor)
            .await?;
        Ok(id)
    }

    async fn query(&mut self, query: &ChoiceQuery) -> Result<Vec<Choice>, Error> {
        let mut stmt = QueryBuilder::<Postgres>::new("SELECT id, question_id, choice_text, votes FROM choices WHERE 1 = 1");
        if let Some(qid) = query.question_id_eq {
            stmt.push(" AND question_id = ").push_bind(qid);
        }
        stmt.push(" ORDER BY id");
        let choices = stmt.build_query_as().fetch_all(&mut *self.executor).await?;
        Ok(choices)
    }

    async fn get(&mut self, question_id: i32, id: i32) -> Result<Option<Choice>, Error> {
        let choice = query_as("SELECT id, question_id, choice_text, votes FROM choices WHERE id = $1 AND question_id = $2")
            .bind(id)
            .bind(question_id)
            .fetch_optional(&mut *self.executor)
            .await?;
        Ok(choice)
    }

    async fn add_votes(&mut self, id: i32, delta: i32) -> Result<(), Error> {
        query("UPDATE choices SET votes = votes + $1 WHERE id = $2")
            .bind(delta)
            .bind(id)
            .execute(&mut *self.executor)
            .await?;
        Ok(())
    }
}

impl<E> VoteCommon for PgSqlx<E>
where
    E: DerefMut<Target = PgConnection>,
{
    async fn insert(&mut self, data: VoteInsert) -> Result<i32, Error> {
        let id = query_scalar("INSERT INTO votes (question_id, user_id, choice_id) VALUES ($1, $2, $3) RETURNING id")
            .bind(data.question_id)
            .bind(data.user_id)
            .bind(data.choice_id)
            .fetch_one(&mut *self.executor)
            .await?;
        Ok(id)
    }

    async fn query(&mut self, query: &VoteQuery) -> Result<Vec<Vote>, Error> {
        let mut stmt = QueryBuilder::<Postgres>::new("SELECT id, question_id, user_id, choice_id FROM votes WHERE 1 = 1");
        if let Some(uid) = query.user_id_eq {
            stmt.push(" AND user_id = ").push_bind(uid);
        }
        if let Some(qid) = query.question_id_eq {
            stmt.push(" AND question_id = ").push_bind(qid);
        }
        stmt.push(" ORDER BY id");
        let votes = stmt.build_query_as().fetch_all(&mut *self.executor).await?;
        Ok(votes)
    }

    async fn get(&mut self, question_id: i32, user_id: i32) -> Result<Option<Vote>, Error> {
        let vote = query_as("SELECT id, question_id, user_id, choice_id FROM votes WHERE question_id = $1 AND user_id = $2")
            .bind(question_id)
            .bind(user_id)
            .fetch_optional(&mut *self.executor)
            .await?;
        Ok(vote)
    }

    async fn update_choice(&mut self, id: i32, choice_id: i32) -> Result<(), Error> {
        query("UPDATE votes SET choice_id = $1 WHERE id = $2")
            .bind(choice_id)
            .bind(id)
            .execute(&mut *self.executor)
            .await?;
        Ok(())
    }
}

impl<E> UserCommon for PgSqlx<E>
where
    E: DerefMut<Target = PgConnection>,
{
    async fn insert(&mut self, data: UserInsert) -> Result<i32, Error> {
        let res = query_scalar("INSERT INTO users (username, password, salt, is_staff) VALUES ($1, $2, $3, $4) RETURNING id")
            .bind(&data.username)
            .bind(data.password)
            .bind(data.salt)
            .bind(data.is_staff)
            .fetch_one(&mut *self.executor)
            .await;
        match res {
            Ok(id) => Ok(id),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(Error::UsernameTaken(data.username)),
            Err(e) => Err(e.into()),
        }
    }

    async fn get(&mut self, id: i32) -> Result<Option<User>, Error> {
        let user = query_as("SELECT id, username, password, salt, is_staff FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.executor)
            .await?;
        Ok(user)
    }

    async fn get_by_username(&mut self, username: &str) -> Result<Option<User>, Error> {
        let user = query_as("SELECT id, username, password, salt, is_staff FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&mut *self.executor)
            .await?;
        Ok(user)
    }

    async fn lock(&mut self, id: i32) -> Result<(), Error> {
        let locked: Option<i32> = query_scalar("SELECT id FROM users WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *self.executor)
            .await?;
        locked.map(|_| ()).ok_or(Error::Unauthorized)
    }
}

impl Common for PgSqlx<PoolConnection<Postgres>> {}
impl Common for PgSqlx<Transaction<'static, Postgres>> {}
impl Store for PgSqlx<PoolConnection<Postgres>> {}
impl Store for PgSqlx<Transaction<'static, Postgres>> {}

impl TxStore for PgSqlx<Transaction<'static, Postgres>> {
    async fn commit(self) -> Result<(), Error> {
        self.executor.commit().await?;
        Ok(())
    }

    async fn rollback(self) -> Result<(), Error> {
        self.executor.rollback().await?;
        Ok(())
    }
}

#[derive(Clone)]
pub struct PgSqlxManager {
    pool: PgPool,
}

impl PgSqlxManager {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, Error> {
        let pool = PgPoolOptions::new().max_connections(max_connections).connect(url).await?;
        Ok(Self::new(pool))
    }

    pub async fn migrate(&self) -> Result<(), Error> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

impl Manager for PgSqlxManager {
    type Store = PgSqlx<PoolConnection<Postgres>>;
    type TxStore = PgSqlx<Transaction<'static, Postgres>>;

    async fn db(&self) -> Result<Self::Store, Error> {
        let conn = self.pool.acquire().await?;
        Ok(PgSqlx::new(conn))
    }

    async fn tx(&self) -> Result<Self::TxStore, Error> {
        let tx = self.pool.begin().await?;
        Ok(PgSqlx::new(tx))
    }
}
