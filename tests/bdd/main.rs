// Runs every feature file against a fresh mock API per scenario

mod steps;

use apirest_bdd_tests::features_dir;
use apirest_monitoring::init_test_tracing;
use cucumber::World;
use steps::hooks::{after_scenario, before_scenario};
use steps::world::ApiWorld;

#[tokio::main]
async fn main() {
    init_test_tracing();

    let features = features_dir();
    assert!(features.is_dir(), "Features directory not found: {features:?}");

    ApiWorld::cucumber()
        .max_concurrent_scenarios(1)
        .before(before_scenario)
        .after(after_scenario)
        .fail_on_skipped()
        .run_and_exit(features)
        .await;
}
