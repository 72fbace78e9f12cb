use crate::core::models::{
    question::QuestionDetail,
    vote::{Cast, Insert as VoteInsert, Query as VoteQuery, Vote},
};
use crate::core::ports::repository::{ChoiceCommon, Store, TxStore, UserCommon, VoteCommon};
use crate::core::services::question::{load_question, with_choices};
use crate::error::Error;
use chrono::{DateTime, Utc};

pub enum Ballot {
    Counted(Cast),
    /// The submitted choice is missing or belongs to another question.
    NoChoice(QuestionDetail),
    Closed,
}

/// Records `uid`'s choice for a question. The user row is locked first so the
/// existence check, the tally updates and the vote write happen as one unit.
pub async fn cast_vote<T>(mut storer: T, uid: i32, question_id: i32, choice_id: Option<i32>, now: DateTime<Utc>) -> Result<Ballot, Error>
where
    T: TxStore,
{
    let question = load_question(&mut storer, question_id).await?;
    if !question.can_vote(now) {
        storer.rollback().await?;
        return Ok(Ballot::Closed);
    }
    let choice = match choice_id {
        Some(cid) => ChoiceCommon::get(&mut storer, question_id, cid).await?,
        None => None,
    };
    let choice = match choice {
        Some(c) => c,
        None => {
            let detail = with_choices(&mut storer, question).await?;
            storer.rollback().await?;
            return Ok(Ballot::NoChoice(detail));
        }
    };
    UserCommon::lock(&mut storer, uid).await?;
    let cast = match VoteCommon::get(&mut storer, question_id, uid).await? {
        Some(v) if v.choice_id == choice.id => Cast::Unchanged,
        Some(v) => {
            ChoiceCommon::add_votes(&mut storer, v.choice_id, -1).await?;
            ChoiceCommon::add_votes(&mut storer, choice.id, 1).await?;
            VoteCommon::update_choice(&mut storer, v.id, choice.id).await?;
            Cast::Changed { from: v.choice_id }
        }
        None => {
            VoteCommon::insert(
                &mut storer,
                VoteInsert {
                    question_id,
                    user_id: uid,
                    choice_id: choice.id,
                },
            )
            .await?;
            ChoiceCommon::add_votes(&mut storer, choice.id, 1).await?;
            Cast::Created
        }
    };
    storer.commit().await?;
    match cast {
        Cast::Created => log::info!("user {} voted for choice {} on question {}", uid, choice.id, question_id),
        Cast::Changed { from } => log::info!("user {} moved vote on question {} from choice {} to {}", uid, question_id, from, choice.id),
        Cast::Unchanged => log::debug!("user {} re-submitted choice {} on question {}", uid, choice.id, question_id),
    }
    Ok(Ballot::Counted(cast))
}

pub async fn user_votes<S>(storer: &mut S, uid: i32) -> Result<Vec<Vote>, Error>
where
    S: Store,
{
    VoteCommon::query(
        storer,
        &VoteQuery {
            user_id_eq: Some(uid),
            ..Default::default()
        },
    )
    .await
}
