//! Catalog-driven generation on the bundled demo catalog.

mod common;

use common::{arms, label};
use opgen_codegen::{ExecutionVars, catalog_body, generate_dispatch, group_branches};
use opgen_ir::{CaseLabel, Stmt};
use opgen_isa::Catalog;

const DEMO: &str = include_str!("../../demos/interpreter.yaml");

fn demo() -> Catalog {
    Catalog::from_yaml_str(DEMO).unwrap()
}

#[test]
fn demo_catalog_loads() {
    let catalog = demo();
    assert_eq!(catalog.len(), 12);
    assert_eq!(catalog.instrumentation_only_count(), 2);
    assert!(catalog.default_body().is_some());
}

#[test]
fn catalog_body_uses_raw_lines() {
    let catalog = demo();
    let pop = catalog.by_name("pop").unwrap();
    assert_eq!(
        catalog_body(&catalog, Some(pop)),
        Some(vec![
            Stmt::raw("sp = sp - 1;"),
            Stmt::raw("bci = bci + 2;"),
            Stmt::raw("continue loop;"),
        ])
    );
    assert_eq!(catalog_body(&catalog, catalog.by_name("throw")), None);
    assert_eq!(catalog_body(&catalog, None).map(|b| b.len()), Some(1));
}

#[test]
fn quickened_variant_shares_its_arm() {
    let catalog = demo();
    let switch = generate_dispatch(&catalog, &ExecutionVars::default(), false);
    let arm = arms(&switch)
        .iter()
        .find(|arm| arm.labels.contains(&label("loadLocal")))
        .unwrap();
    assert_eq!(arm.labels, vec![label("loadLocal"), label("loadLocal.boxed")]);
}

#[test]
fn bodyless_opcodes_share_the_no_op_arm() {
    let catalog = demo();
    let switch = generate_dispatch(&catalog, &ExecutionVars::default(), true);
    let arm = arms(&switch)
        .iter()
        .find(|arm| arm.body == vec![Stmt::Block(vec![Stmt::Break])])
        .unwrap();
    assert_eq!(
        arm.labels,
        vec![label("branchFalse"), label("throw"), label("traceReturn")]
    );
}

#[test]
fn instrumentation_changes_arm_count() {
    let catalog = demo();
    let without = group_branches(&catalog, false, |info| catalog_body(&catalog, info));
    let with = group_branches(&catalog, true, |info| catalog_body(&catalog, info));

    // default, pop, dup, loadConstant, loadLocal(+boxed), storeLocal, branch,
    // no-op, return
    assert_eq!(without.len(), 9);
    // plus traceStatement; traceReturn joins the no-op arm
    assert_eq!(with.len(), 10);

    let labels = |groups: &[opgen_codegen::BranchGroup<'_>]| -> usize {
        groups.iter().map(|g| g.opcodes.len()).sum()
    };
    assert_eq!(labels(&without), 10);
    assert_eq!(labels(&with), 12);
    assert!(without[0].is_default);
    assert_eq!(without[0].clone().into_arm().labels, vec![CaseLabel::Default]);
}
