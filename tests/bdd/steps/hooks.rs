use cucumber::event::ScenarioFinished;
use cucumber::gherkin::{Feature, Rule, Scenario};
use futures::future::LocalBoxFuture;
use futures::FutureExt;
use tracing::{error, info, warn};

use super::world::ApiWorld;

pub fn before_scenario<'a>(
    feature: &'a Feature,
    _rule: Option<&'a Rule>,
    scenario: &'a Scenario,
    world: &'a mut ApiWorld,
) -> LocalBoxFuture<'a, ()> {
    async move {
        info!(
            feature = %feature.name,
            scenario = %scenario.name,
            line = scenario.position.line,
            "Starting scenario"
        );

        if let Err(e) = world.connect().await {
            error!(scenario = %scenario.name, error = %e, "Scenario setup failed");
        }
    }
    .boxed_local()
}

pub fn after_scenario<'a>(
    feature: &'a Feature,
    _rule: Option<&'a Rule>,
    scenario: &'a Scenario,
    finished: &'a ScenarioFinished,
    _world: Option<&'a mut ApiWorld>,
) -> LocalBoxFuture<'a, ()> {
    async move {
        let outcome = match finished {
            ScenarioFinished::StepPassed => "passed",
            ScenarioFinished::StepSkipped => "skipped",
            _ => "failed",
        };

        if outcome == "passed" {
            info!(
                feature = %feature.name,
                scenario = %scenario.name,
                line = scenario.position.line,
                outcome,
                "Finished scenario"
            );
        } else {
            warn!(
                feature = %feature.name,
                scenario = %scenario.name,
                line = scenario.position.line,
                outcome,
                "Finished scenario"
            );
        }
    }
    .boxed_local()
}
