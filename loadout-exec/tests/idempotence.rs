//! Apply → re-resolve round trips against the simulated account.

use std::sync::Arc;

use loadout_domain::{codec, AccountSnapshot, CharacterId, ItemBucket, LoadoutSpec};
use loadout_engine::Engine;
use loadout_exec::{Executor, ManifestCache, StubInventory, StubManifest};
use loadout_testkit::{
    armor, catalog_for, character, exotic_weapon, plug_definition, raw_inventory_from, subclass,
    weapon, SnapshotBuilder,
};

const LOADOUT: &str = "\
LOADOUT // Raid Night
EQUIP // 10:sub // Subclass
EQUIP // 200:def // Kinetic
SOCKET // 200:def::index:0::plug:71 // Barrel
SOCKET // 200:def::index:2::plug:72 // Magazine
EQUIP // 300:ghi // Exotic Energy
EQUIP // 400:vlt // Power
EQUIP // 500:hlm // Helmet
EXTRA // 301:jkl // Legendary Energy
";

fn account() -> AccountSnapshot {
    SnapshotBuilder::new()
        .equipped("C1", subclass(10, "sub"))
        .equipped("C1", weapon(100, "abc", ItemBucket::Kinetic))
        .equipped("C1", exotic_weapon(310, "old", ItemBucket::Energy))
        .unequipped("C1", weapon(301, "jkl", ItemBucket::Energy))
        .equipped("C2", weapon(201, "c2k", ItemBucket::Kinetic))
        .unequipped("C2", weapon(200, "def", ItemBucket::Kinetic))
        .unequipped("C2", exotic_weapon(300, "ghi", ItemBucket::Energy))
        .vault(weapon(400, "vlt", ItemBucket::Power))
        .vault(armor(500, "hlm", ItemBucket::Helmet))
        .plugs("def", &[Some(70), None, Some(73)])
        .build()
}

async fn engine_for(snapshot: &AccountSnapshot, spec: &LoadoutSpec) -> anyhow::Result<Engine> {
    let mut definitions: Vec<_> = catalog_for(snapshot).into();
    definitions.push(plug_definition(71, "Barrel"));
    definitions.push(plug_definition(72, "Magazine"));
    let manifest = Arc::new(StubManifest::new(definitions));

    let raw = raw_inventory_from(snapshot);
    let mut hashes = raw.referenced_hashes();
    hashes.extend(spec.referenced_hashes());

    let catalog = ManifestCache::new(manifest).prefetch(hashes).await?;
    Ok(Engine::new(catalog))
}

fn c1() -> CharacterId {
    character("C1")
}

#[tokio::test]
async fn test_applied_loadout_resolves_to_all_skip() -> anyhow::Result<()> {
    let spec = codec::parse(LOADOUT, "unused")?;
    let snapshot = account();
    let engine = engine_for(&snapshot, &spec).await?;

    let plan = engine.resolve(&spec, &snapshot, &c1())?;
    assert!(!plan.is_satisfied());
    // de-exotic swap leads the plan
    assert_eq!(plan.actions[0].action.to_string(), "Equip(C1, 301:jkl)");

    let inventory = Arc::new(StubInventory::new(snapshot));
    let report = Executor::new(inventory.clone()).run(&plan, false).await;
    assert!(report.is_success(), "{}", report);

    let after = inventory.snapshot();
    let replan = engine.resolve(&spec, &after, &c1())?;
    assert!(replan.is_satisfied(), "{}", replan);

    let calls_before = inventory.calls().len();
    let rerun = Executor::new(inventory.clone()).run(&replan, false).await;
    assert_eq!(rerun.applied(), 0);
    assert_eq!(rerun.skipped(), replan.len());
    assert_eq!(inventory.calls().len(), calls_before);
    Ok(())
}

#[tokio::test]
async fn test_rerun_recovers_from_failed_action() -> anyhow::Result<()> {
    let spec = codec::parse(LOADOUT, "unused")?;
    let snapshot = account();
    let engine = engine_for(&snapshot, &spec).await?;
    let inventory = Arc::new(StubInventory::new(snapshot.clone()));
    let executor = Executor::new(inventory.clone());

    inventory.set_fail_next(true);
    let plan = engine.resolve(&spec, &snapshot, &c1())?;
    let first = executor.run(&plan, false).await;
    assert!(first.failed() >= 1);
    assert!(first.applied() >= 1);

    let second_plan = engine.resolve(&spec, &inventory.snapshot(), &c1())?;
    let second = executor.run(&second_plan, false).await;
    assert!(second.is_success(), "{}", second);

    let final_plan = engine.resolve(&spec, &inventory.snapshot(), &c1())?;
    assert!(final_plan.is_satisfied(), "{}", final_plan);
    Ok(())
}

#[tokio::test]
async fn test_dry_run_leaves_account_untouched() -> anyhow::Result<()> {
    let spec = codec::parse(LOADOUT, "unused")?;
    let snapshot = account();
    let engine = engine_for(&snapshot, &spec).await?;
    let inventory = Arc::new(StubInventory::new(snapshot.clone()));

    let plan = engine.resolve(&spec, &snapshot, &c1())?;
    let report = Executor::new(inventory.clone()).run(&plan, true).await;

    assert_eq!(report.skipped(), plan.len());
    assert!(inventory.calls().is_empty());
    assert_eq!(inventory.snapshot(), snapshot);
    Ok(())
}

#[tokio::test]
async fn test_rerun_after_swap_recovers_when_exotic_move_fails() -> anyhow::Result<()> {
    let snapshot = SnapshotBuilder::new()
        .equipped("C1", subclass(10, "sub"))
        .unequipped("C2", exotic_weapon(300, "ghi", ItemBucket::Energy))
        .vault(weapon(302, "mno", ItemBucket::Energy))
        .build();
    let spec = codec::parse("EQUIP // 300:ghi", "Swap")?;
    let engine = engine_for(&snapshot, &spec).await?;
    let inventory = Arc::new(StubInventory::new(snapshot.clone()));
    let executor = Executor::new(inventory.clone());

    let plan = engine.resolve(&spec, &snapshot, &c1())?;
    let rendered: Vec<String> = plan.actions.iter().map(|a| a.action.to_string()).collect();
    assert_eq!(
        rendered,
        vec![
            "Withdraw(C1, 302:mno)",
            "Equip(C1, 302:mno)",
            "Deposit(C2, 300:ghi)",
            "Withdraw(C1, 300:ghi)",
            "Equip(C1, 300:ghi)",
        ]
    );

    // swap lands, then the exotic's deposit fails
    let (swap, rest) = plan.actions.split_at(2);
    let swapped = executor.apply(swap, false).await;
    assert!(swapped.iter().all(|o| !o.is_failed()));
    inventory.set_fail_next(true);
    let moved = executor.apply(rest, false).await;
    assert!(moved[0].is_failed());

    let retry = engine.resolve(&spec, &inventory.snapshot(), &c1())?;
    assert!(retry.actions[0].skip, "{}", retry);
    assert_eq!(retry.actions[0].action.to_string(), "Equip(C1, 302:mno)");
    let report = executor.run(&retry, false).await;
    assert!(report.is_success(), "{}", report);

    let after = engine.resolve(&spec, &inventory.snapshot(), &c1())?;
    assert!(after.is_satisfied(), "{}", after);
    Ok(())
}
