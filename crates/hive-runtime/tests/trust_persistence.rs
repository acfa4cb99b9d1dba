mod common;

use common::*;
use hive_runtime::prelude::*;

#[test]
fn trust_survives_a_restart() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = JsonTrustStore::new(dir.path().join("trust"));
    let config = two_agent_config();

    let mut first = Team::from_config(&config).unwrap();
    let mut world = GridWorld::two_rooms(&first.roster(), &starts());
    first.run_until_complete(&mut world, 200).unwrap();
    first
        .agent_mut(&AgentId::from("alice"))
        .unwrap()
        .ledger_mut()
        .decrease(&AgentId::from("bob"), TrustCategory::FoundGoal);
    first.save_trust(&mut store).unwrap();

    let mut second = Team::from_config(&config).unwrap();
    assert_eq!(second.load_trust(&store).unwrap(), 2);

    for agent in first.agents() {
        let restored = second.agent(agent.id()).unwrap();
        assert_eq!(restored.ledger().records(), agent.ledger().records());
    }
    let alice = second.agent(&AgentId::from("alice")).unwrap();
    assert!(alice.ledger().score(&AgentId::from("bob"), TrustCategory::FoundGoal) < 0.5);
}

#[test]
fn fresh_store_loads_nothing() {
    let store = MemoryTrustStore::new();
    let mut team = Team::from_config(&two_agent_config()).unwrap();
    assert_eq!(team.load_trust(&store).unwrap(), 0);
}

#[test]
fn team_loads_from_a_toml_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("team.toml");
    std::fs::write(
        &path,
        r#"
        [[agents]]
        name = "alice"

        [[agents]]
        name = "bob"
        carry_capacity = 2
        "#,
    )
    .unwrap();

    let config = TeamConfig::load(&path).unwrap();
    let team = Team::from_config(&config).unwrap();
    assert_eq!(team.roster(), vec![AgentId::from("alice"), AgentId::from("bob")]);
}
