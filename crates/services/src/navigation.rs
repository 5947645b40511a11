use std::fmt;
use std::time::Duration;

use quiz_core::model::SectionId;
use quiz_core::reward::RewardStage;

/// Screens of the quiz flow.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    SectionSelect,
    Quiz(SectionId),
    Results(SectionId),
    Reward,
    PrizeWheel,
}

impl Route {
    /// Whether the route can be entered at `stage`.
    ///
    /// The reward screen and the prize wheel open only once every section is passed.
    #[must_use]
    pub fn is_allowed(&self, stage: RewardStage) -> bool {
        match self {
            Route::Reward | Route::PrizeWheel => stage.is_terminal(),
            Route::SectionSelect | Route::Quiz(_) | Route::Results(_) => true,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::SectionSelect => f.write_str("/"),
            Route::Quiz(id) => write!(f, "/quiz/{id}"),
            Route::Results(id) => write!(f, "/results/{id}"),
            Route::Reward => f.write_str("/reward"),
            Route::PrizeWheel => f.write_str("/prize"),
        }
    }
}

/// Deferred move to another screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationCommand {
    pub route: Route,
    pub delay: Duration,
}

impl NavigationCommand {
    #[must_use]
    pub fn after(route: Route, delay: Duration) -> Self {
        Self { route, delay }
    }

    /// Sleep for the delay and hand back the target route.
    pub async fn wait(self) -> Route {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.route
    }
}
