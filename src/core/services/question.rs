use crate::core::models::{
    choice::{Insert as ChoiceInsert, Query as ChoiceQuery, CHOICE_TEXT_MAX_LEN},
    question::{Insert as QuestionInsert, Query, Question, QuestionCreate, QuestionDetail, QuestionSummary, QUESTION_TEXT_MAX_LEN},
    vote::Vote,
};
use crate::core::ports::repository::{ChoiceCommon, QuestionCommon, Store, TxStore, UserCommon, VoteCommon};
use crate::error::Error;
use chrono::{DateTime, Utc};

pub enum Eligibility {
    Open(QuestionDetail),
    Closed,
}

pub(crate) async fn load_question<S>(storer: &mut S, id: i32) -> Result<Question, Error>
where
    S: Store,
{
    QuestionCommon::get(storer, id).await?.ok_or_else(|| Error::NotFound(format!("question {}", id)))
}

pub(crate) async fn with_choices<S>(storer: &mut S, question: Question) -> Result<QuestionDetail, Error>
where
    S: Store,
{
    let choices = ChoiceCommon::query(storer, &ChoiceQuery { question_id_eq: Some(question.id) }).await?;
    Ok(QuestionDetail::new(question, choices))
}

pub async fn published_questions<S>(storer: &mut S, now: DateTime<Utc>) -> Result<Vec<QuestionSummary>, Error>
where
    S: Store,
{
    let questions = QuestionCommon::query(storer, &Query { pub_date_lte: Some(now) }).await?;
    Ok(questions.into_iter().map(|q| QuestionSummary::new(q, now)).collect())
}

/// Unpublished questions are reported as missing.
pub async fn question_detail<S>(storer: &mut S, id: i32, now: DateTime<Utc>) -> Result<QuestionDetail, Error>
where
    S: Store,
{
    let question = load_question(storer, id).await?;
    if !question.is_published(now) {
        return Err(Error::NotFound(format!("question {}", id)));
    }
    with_choices(storer, question).await
}

pub async fn voteable_question<S>(storer: &mut S, id: i32, now: DateTime<Utc>) -> Result<Eligibility, Error>
where
    S: Store,
{
    let question = load_question(storer, id).await?;
    if !question.can_vote(now) {
        return Ok(Eligibility::Closed);
    }
    Ok(Eligibility::Open(with_choices(storer, question).await?))
}

/// The question with its tallies, plus the vote `uid` cast on it if any.
pub async fn question_results<S>(storer: &mut S, id: i32, uid: Option<i32>, now: DateTime<Utc>) -> Result<(QuestionDetail, Option<Vote>), Error>
where
    S: Store,
{
    let detail = question_detail(storer, id, now).await?;
    let vote = match uid {
        Some(uid) => VoteCommon::get(storer, id, uid).await?,
        None => None,
    };
    Ok((detail, vote))
}

async fn ensure_staff<S>(storer: &mut S, uid: i32) -> Result<(), Error>
where
    S: Store,
{
    match UserCommon::get(storer, uid).await? {
        Some(user) if user.is_staff => Ok(()),
        Some(_) => Err(Error::Forbidden),
        None => Err(Error::Unauthorized),
    }
}

fn validate(question: &QuestionCreate) -> Result<(), Error> {
    let text = question.question_text.trim();
    if text.is_empty() || text.chars().count() > QUESTION_TEXT_MAX_LEN {
        return Err(Error::BusinessError(format!("question text must be 1 to {} characters", QUESTION_TEXT_MAX_LEN)));
    }
    if question.pub_date > question.end_date {
        return Err(Error::BusinessError("pub_date must not be later than end_date".into()));
    }
    for c in &question.choices {
        let text = c.trim();
        if text.is_empty() || text.chars().count() > CHOICE_TEXT_MAX_LEN {
            return Err(Error::BusinessError(format!("choice text must be 1 to {} characters", CHOICE_TEXT_MAX_LEN)));
        }
    }
    Ok(())
}

pub async fn create_question<T>(mut storer: T, uid: i32, question: QuestionCreate) -> Result<i32, Error>
where
    T: TxStore,
{
    ensure_staff(&mut storer, uid).await?;
    validate(&question)?;
    let qid = QuestionCommon::insert(
        &mut storer,
        QuestionInsert {
            question_text: question.question_text.trim().to_owned(),
            pub_date: question.pub_date,
            end_date: question.end_date,
        },
    )
    .await?;
    for c in question.choices {
        ChoiceCommon::insert(
            &mut storer,
            ChoiceInsert {
                question_id: qid,
                choice_text: c.trim().to_owned(),
            },
        )
        .await?;
    }
    storer.commit().await?;
    log::info!("user {} created question {}", uid, qid);
    Ok(qid)
}

pub async fn delete_question<T>(mut storer: T, uid: i32, id: i32) -> Result<(), Error>
where
    T: TxStore,
{
    ensure_staff(&mut storer, uid).await?;
    if !QuestionCommon::delete(&mut storer, id).await? {
        return Err(Error::NotFound(format!("question {}", id)));
    }
    storer.commit().await?;
    log::info!("user {} deleted question {}", uid, id);
    Ok(())
}
