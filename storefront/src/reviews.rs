//! Review submission and display.
//!
//! The review form and the review board never reference each other. The form
//! validates a draft on submit and, when it is well-formed, publishes the
//! accepted [`Review`] on the notification bus under [`REVIEW_SUBMITTED`].
//! The [`ReviewBoard`] subscribes to that event and exclusively owns the
//! append-only sequence of accepted reviews.
//!
//! Validation is collect-all, not fail-fast: a submit attempt checks the four
//! required fields independently and reports one message per missing field,
//! so the view can display every outstanding problem at once.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, PoisonError};
use storefront_core::bus::{NotificationBus, Subscription};
use storefront_core::environment::Clock;
use storefront_core::{SmallVec, effect::Effect, reducer::Reducer, smallvec};

/// Event name under which accepted reviews are published
pub const REVIEW_SUBMITTED: &str = "review-submitted";

/// Would the reviewer recommend the product?
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recommendation {
    /// They would
    Yes,
    /// They would not
    No,
}

impl std::fmt::Display for Recommendation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Yes => "Yes",
            Self::No => "No",
        })
    }
}

/// A star rating, always within 1..=5
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Rating(u8);

impl Rating {
    /// Lowest accepted rating
    pub const MIN: u8 = 1;
    /// Highest accepted rating
    pub const MAX: u8 = 5;

    /// Creates a rating, rejecting values outside 1..=5
    #[must_use]
    pub const fn new(value: u8) -> Option<Self> {
        if value >= Self::MIN && value <= Self::MAX {
            Some(Self(value))
        } else {
            None
        }
    }

    /// Returns the numeric value
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl std::fmt::Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An accepted review. Immutable after creation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    /// Reviewer's name
    pub name: String,
    /// Review body text
    pub body: String,
    /// Star rating
    pub rating: Rating,
    /// Recommendation answer
    pub recommend: Recommendation,
    /// When the review was accepted
    pub submitted_at: DateTime<Utc>,
}

/// Form fields as the user typed them, before validation
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewDraft {
    /// Name field
    pub name: String,
    /// Body field
    pub body: String,
    /// Rating field; raw input, range-checked on submit
    pub rating: Option<u8>,
    /// Recommendation field
    pub recommend: Option<Recommendation>,
}

impl ReviewDraft {
    /// Whether every field is still untouched
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
            && self.body.is_empty()
            && self.rating.is_none()
            && self.recommend.is_none()
    }

    /// Validate the draft, collecting one message per problem.
    ///
    /// All four required fields are checked independently; the error list
    /// preserves field order (name, body, rating, recommendation).
    ///
    /// # Errors
    ///
    /// Returns the ordered list of human-readable messages when any field is
    /// missing or out of range.
    pub fn validate(&self, submitted_at: DateTime<Utc>) -> Result<Review, Vec<String>> {
        let mut errors = Vec::new();

        if self.name.trim().is_empty() {
            errors.push("Name required.".to_string());
        }
        if self.body.trim().is_empty() {
            errors.push("Review required.".to_string());
        }
        let rating = match self.rating {
            None => {
                errors.push("Rating required.".to_string());
                None
            },
            Some(value) => {
                let rating = Rating::new(value);
                if rating.is_none() {
                    errors.push(format!(
                        "Rating must be between {} and {}.",
                        Rating::MIN,
                        Rating::MAX
                    ));
                }
                rating
            },
        };
        if self.recommend.is_none() {
            errors.push("Recommendation required.".to_string());
        }

        match (errors.is_empty(), rating, self.recommend) {
            (true, Some(rating), Some(recommend)) => Ok(Review {
                name: self.name.trim().to_string(),
                body: self.body.trim().to_string(),
                rating,
                recommend,
                submitted_at,
            }),
            _ => Err(errors),
        }
    }
}

/// Lifecycle of the review form
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormPhase {
    /// Nothing entered yet (or just successfully submitted and reset)
    #[default]
    Empty,
    /// At least one field touched since the last submit attempt
    Editing,
    /// The last submit attempt failed validation
    Invalid,
    /// The last submit attempt succeeded; the draft has been reset
    Submitted,
}

/// State of the review form component
#[derive(Clone, Debug, Default)]
pub struct ReviewFormState {
    /// Current field values
    pub draft: ReviewDraft,
    /// Messages from the last failed submit attempt, in field order
    pub errors: Vec<String>,
    /// Where the form is in its lifecycle
    pub phase: FormPhase,
}

/// Actions for the review form
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReviewFormAction {
    /// User edited the name field
    SetName(String),
    /// User edited the body field
    SetBody(String),
    /// User picked a rating
    SetRating(u8),
    /// User answered the recommendation question
    SetRecommendation(Recommendation),
    /// User pressed submit
    Submit,
}

/// Environment for the review form reducer
#[derive(Clone)]
pub struct ReviewFormEnvironment {
    /// Clock stamping accepted reviews
    pub clock: Arc<dyn Clock>,
    /// Bus carrying accepted reviews to whoever displays them
    pub bus: NotificationBus<Review>,
}

impl ReviewFormEnvironment {
    /// Creates a new environment
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, bus: NotificationBus<Review>) -> Self {
        Self { clock, bus }
    }
}

impl std::fmt::Debug for ReviewFormEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReviewFormEnvironment")
            .field("bus", &self.bus)
            .finish_non_exhaustive()
    }
}

/// Reducer for the review form
#[derive(Clone, Copy, Debug, Default)]
pub struct ReviewFormReducer;

impl ReviewFormReducer {
    /// Creates a new review form reducer
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Reducer for ReviewFormReducer {
    type State = ReviewFormState;
    type Action = ReviewFormAction;
    type Environment = ReviewFormEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            ReviewFormAction::SetName(name) => {
                state.draft.name = name;
                state.phase = FormPhase::Editing;
            },
            ReviewFormAction::SetBody(body) => {
                state.draft.body = body;
                state.phase = FormPhase::Editing;
            },
            ReviewFormAction::SetRating(rating) => {
                state.draft.rating = Some(rating);
                state.phase = FormPhase::Editing;
            },
            ReviewFormAction::SetRecommendation(recommend) => {
                state.draft.recommend = Some(recommend);
                state.phase = FormPhase::Editing;
            },
            ReviewFormAction::Submit => match state.draft.validate(env.clock.now()) {
                Ok(review) => {
                    state.draft = ReviewDraft::default();
                    state.errors.clear();
                    state.phase = FormPhase::Submitted;
                    tracing::debug!(reviewer = %review.name, "review accepted");

                    let bus = env.bus.clone();
                    return smallvec![Effect::Future(Box::pin(async move {
                        bus.publish(REVIEW_SUBMITTED, &review);
                        None
                    }))];
                },
                Err(errors) => {
                    // Draft stays intact so the user can fix it in place.
                    tracing::debug!(problems = errors.len(), "review rejected");
                    state.errors = errors;
                    state.phase = FormPhase::Invalid;
                },
            },
        }

        SmallVec::new()
    }
}

/// Display component owning the accepted reviews.
///
/// Populated only via bus notification, never written directly. The
/// subscription is dropped with the board, so a torn-down board stops
/// listening.
#[derive(Debug)]
pub struct ReviewBoard {
    reviews: Arc<Mutex<Vec<Review>>>,
    _subscription: Subscription<Review>,
}

impl ReviewBoard {
    /// Creates a board subscribed to [`REVIEW_SUBMITTED`] on `bus`
    #[must_use]
    pub fn new(bus: &NotificationBus<Review>) -> Self {
        let reviews = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&reviews);
        let subscription = bus.subscribe(REVIEW_SUBMITTED, move |review: &Review| {
            sink.lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(review.clone());
        });
        Self {
            reviews,
            _subscription: subscription,
        }
    }

    /// Snapshot of the accepted reviews, oldest first
    #[must_use]
    pub fn reviews(&self) -> Vec<Review> {
        self.reviews
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of accepted reviews
    #[must_use]
    pub fn len(&self) -> usize {
        self.reviews
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether no review has been accepted yet
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use storefront_testing::{ReducerTest, assertions, test_clock};

    fn env() -> ReviewFormEnvironment {
        ReviewFormEnvironment::new(Arc::new(test_clock()), NotificationBus::new())
    }

    fn filled_draft() -> ReviewDraft {
        ReviewDraft {
            name: "Ada".to_string(),
            body: "Warm and fuzzy indeed.".to_string(),
            rating: Some(5),
            recommend: Some(Recommendation::Yes),
        }
    }

    #[test]
    fn rating_rejects_out_of_range_values() {
        assert!(Rating::new(0).is_none());
        assert!(Rating::new(6).is_none());
        assert_eq!(Rating::new(3).map(Rating::get), Some(3));
    }

    #[test]
    fn field_edits_move_the_form_into_editing() {
        ReducerTest::new(ReviewFormReducer::new())
            .with_env(env())
            .given_state(ReviewFormState::default())
            .when_action(ReviewFormAction::SetName("Ada".to_string()))
            .then_state(|state| {
                assert_eq!(state.phase, FormPhase::Editing);
                assert_eq!(state.draft.name, "Ada");
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn valid_submit_resets_the_draft_and_publishes() {
        ReducerTest::new(ReviewFormReducer::new())
            .with_env(env())
            .given_state(ReviewFormState {
                draft: filled_draft(),
                errors: vec!["stale error".to_string()],
                phase: FormPhase::Editing,
            })
            .when_action(ReviewFormAction::Submit)
            .then_state(|state| {
                assert_eq!(state.phase, FormPhase::Submitted);
                assert!(state.draft.is_empty());
                assert!(state.errors.is_empty());
            })
            .then_effects(|effects| {
                assertions::assert_effects_count(effects, 1);
                assertions::assert_has_future_effect(effects);
            })
            .run();
    }

    #[test]
    fn submit_with_two_missing_fields_reports_both_and_keeps_the_draft() {
        ReducerTest::new(ReviewFormReducer::new())
            .with_env(env())
            .given_state(ReviewFormState {
                draft: ReviewDraft {
                    name: "Ada".to_string(),
                    body: "Nice socks.".to_string(),
                    rating: None,
                    recommend: None,
                },
                errors: Vec::new(),
                phase: FormPhase::Editing,
            })
            .when_action(ReviewFormAction::Submit)
            .then_state(|state| {
                assert_eq!(state.phase, FormPhase::Invalid);
                assert_eq!(
                    state.errors,
                    vec![
                        "Rating required.".to_string(),
                        "Recommendation required.".to_string()
                    ]
                );
                // Prior field values stay intact.
                assert_eq!(state.draft.name, "Ada");
                assert_eq!(state.draft.body, "Nice socks.");
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn submit_with_everything_missing_reports_all_four_in_field_order() {
        ReducerTest::new(ReviewFormReducer::new())
            .with_env(env())
            .given_state(ReviewFormState::default())
            .when_action(ReviewFormAction::Submit)
            .then_state(|state| {
                assert_eq!(
                    state.errors,
                    vec![
                        "Name required.".to_string(),
                        "Review required.".to_string(),
                        "Rating required.".to_string(),
                        "Recommendation required.".to_string(),
                    ]
                );
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn out_of_range_rating_fails_validation() {
        let draft = ReviewDraft {
            rating: Some(9),
            ..filled_draft()
        };
        let errors = draft.validate(test_clock().now()).unwrap_err();
        assert_eq!(errors, vec!["Rating must be between 1 and 5.".to_string()]);
    }

    #[test]
    fn whitespace_only_fields_count_as_missing() {
        let draft = ReviewDraft {
            name: "   ".to_string(),
            body: "\t".to_string(),
            ..filled_draft()
        };
        let errors = draft.validate(test_clock().now()).unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn accepted_review_is_stamped_with_the_clock_time() {
        let clock = test_clock();
        let review = filled_draft().validate(clock.now()).unwrap();
        assert_eq!(review.submitted_at, clock.now());
        assert_eq!(review.rating.get(), 5);
        assert_eq!(review.recommend, Recommendation::Yes);
    }

    #[test]
    fn board_appends_reviews_in_publish_order() {
        let bus: NotificationBus<Review> = NotificationBus::new();
        let board = ReviewBoard::new(&bus);
        assert!(board.is_empty());

        let first = filled_draft().validate(test_clock().now()).unwrap();
        let second = Review {
            name: "Grace".to_string(),
            ..first.clone()
        };
        bus.publish(REVIEW_SUBMITTED, &first);
        bus.publish(REVIEW_SUBMITTED, &second);

        let reviews = board.reviews();
        assert_eq!(reviews.len(), 2);
        assert_eq!(reviews[0].name, "Ada");
        assert_eq!(reviews[1].name, "Grace");
    }

    #[test]
    fn dropped_board_stops_listening() {
        let bus: NotificationBus<Review> = NotificationBus::new();
        let board = ReviewBoard::new(&bus);
        assert_eq!(bus.subscriber_count(REVIEW_SUBMITTED), 1);

        drop(board);
        assert_eq!(bus.subscriber_count(REVIEW_SUBMITTED), 0);

        // Publishing with nobody listening is still fine.
        let review = filled_draft().validate(test_clock().now()).unwrap();
        bus.publish(REVIEW_SUBMITTED, &review);
    }
}
