//! Scenario tests for flex and layout bindings, driven through markup
//! templates and the mock media source.

use flexout::{ActiveState, LayoutConfig};
use flexout_test::Fixture;

fn single(template: &str) -> (Fixture, flexout::NodeId) {
    let fixture = Fixture::new(template).unwrap();
    let el = fixture.first().unwrap();
    (fixture, el)
}

fn expect_styles(template: &str, expected: &[(&str, &str)]) {
    let (fixture, el) = single(template);
    fixture.assert_has_styles(el, expected);
}

fn expect_no_styles(template: &str, unexpected: &[(&str, &str)]) {
    let (fixture, el) = single(template);
    fixture.assert_lacks_styles(el, unexpected);
}

// ============================================================================
// Static values
// ============================================================================

#[test]
fn test_default_flex() {
    expect_styles(
        "<div flex></div>",
        &[("box-sizing", "border-box"), ("flex", "1 1 0%")],
    );
    expect_no_styles("<div flex></div>", &[("max-width", "*"), ("min-width", "*")]);
}

#[test]
fn test_small_percentage() {
    expect_styles(
        r#"<div flex="2%"></div>"#,
        &[
            ("max-width", "2%"),
            ("flex", "1 1 100%"),
            ("box-sizing", "border-box"),
        ],
    );
}

#[test]
fn test_percentage_values() {
    expect_styles(
        r#"<div flex="37%"></div>"#,
        &[
            ("flex", "1 1 100%"),
            ("max-width", "37%"),
            ("box-sizing", "border-box"),
        ],
    );
}

#[test]
fn test_pixel_values() {
    expect_styles(
        r#"<div flex="37px"></div>"#,
        &[("flex", "1 1 37px"), ("box-sizing", "border-box")],
    );
}

#[test]
fn test_grow_no_shrink_auto() {
    expect_styles(
        r#"<div flex="1 0 auto"></div>"#,
        &[("flex", "1 0 auto"), ("box-sizing", "border-box")],
    );
}

#[test]
fn test_full_triple() {
    expect_styles(r#"<div flex="1 2 0.9em"></div>"#, &[("flex", "1 2 0.9em")]);
}

#[test]
fn test_min_width_when_shrink_is_zero() {
    expect_styles(
        r#"<div flex="1 0 37px"></div>"#,
        &[
            ("flex", "1 0 37px"),
            ("min-width", "37px"),
            ("box-sizing", "border-box"),
        ],
    );
    expect_no_styles(r#"<div flex="1 0 69px"></div>"#, &[("max-width", "*")]);
    expect_no_styles(r#"<div flex="1 0 303px"></div>"#, &[("max-width", "*")]);
}

#[test]
fn test_min_and_max_when_fixed() {
    expect_styles(
        r#"<div flex="0 0 375px"></div>"#,
        &[
            ("flex", "0 0 375px"),
            ("max-width", "375px"),
            ("min-width", "375px"),
            ("box-sizing", "border-box"),
        ],
    );
}

#[test]
fn test_no_min_width_when_grow_is_zero() {
    expect_no_styles(r#"<div flex="0 1 96px"></div>"#, &[("min-width", "*")]);
    expect_no_styles(r#"<div flex="0 1 313px"></div>"#, &[("min-width", "*")]);
}

#[test]
fn test_pixel_basis_sets_min_and_max() {
    expect_styles(
        r#"<div flex="312px"></div>"#,
        &[
            ("flex", "1 1 312px"),
            ("max-width", "312px"),
            ("min-width", "312px"),
        ],
    );
}

#[test]
fn test_calc_values() {
    expect_styles(
        r#"<div flex="calc(30vw - 10px)"></div>"#,
        &[("box-sizing", "border-box"), ("flex", "1 1 calc(30vw - 10px)")],
    );
}

#[test]
fn test_calc_without_internal_whitespace() {
    expect_styles(
        r#"<div flex="calc(75%-10px)"></div>"#,
        &[("box-sizing", "border-box"), ("flex", "1 1 calc(75% - 10px)")],
    );
}

#[test]
fn test_keywords() {
    for (keyword, flex) in [
        ("auto", "1 1 auto"),
        ("nogrow", "0 1 auto"),
        ("grow", "1 1 100%"),
        ("initial", "0 1 auto"),
        ("noshrink", "1 0 auto"),
        ("none", "0 0 auto"),
    ] {
        let template = format!(r#"<div flex="{}"></div>"#, keyword);
        expect_styles(&template, &[("flex", flex)]);
        expect_no_styles(&template, &[("min-width", "*"), ("max-width", "*")]);
    }
}

#[test]
fn test_malformed_value_leaves_element_unstyled() {
    expect_no_styles(r#"<div flex="wide"></div>"#, &[("flex", "*"), ("box-sizing", "*")]);
}

// ============================================================================
// Parent direction
// ============================================================================

#[test]
fn test_layout_parent() {
    let fixture = Fixture::new(
        r#"
        <div layout="column" class="test">
          <div flex="30px" flex.gt-sm="50"></div>
        </div>
        "#,
    )
    .unwrap();
    let parent = fixture.query_one(".test");
    let element = fixture.query_one("[flex]");

    fixture.assert_has_styles(parent, &[("flex-direction", "column"), ("display", "flex")]);
    fixture.assert_has_styles(element, &[("min-height", "30px")]);
    fixture.assert_lacks_styles(element, &[("min-width", "*")]);
}

#[test]
fn test_non_direct_parent_layout_is_ignored() {
    let fixture = Fixture::new(
        r#"
        <div layout="column">
          <div class="test">
            <div flex="40px" flex.gt-sm="50"></div>
          </div>
        </div>
        "#,
    )
    .unwrap();
    let element = fixture.query_one("[flex]");
    let parent = fixture.query_one(".test");

    fixture.assert_has_styles(parent, &[("flex-direction", "row")]);
    fixture.assert_has_styles(element, &[("min-width", "40px")]);
    fixture.assert_lacks_styles(element, &[("min-height", "*")]);
}

#[test]
fn test_no_injection_when_disabled() {
    let config = LayoutConfig::from_yaml("inject_default_direction: false").unwrap();
    let fixture = Fixture::with_config(
        r#"
        <div class="test">
          <div flex="40px"></div>
        </div>
        "#,
        config,
    )
    .unwrap();

    fixture.assert_lacks_styles(fixture.query_one(".test"), &[("flex-direction", "*")]);
    fixture.assert_has_styles(fixture.query_one("[flex]"), &[("min-width", "40px")]);
}

#[test]
fn test_styled_parent_direction() {
    let fixture = Fixture::new(
        r#"
        <div layout="row">
          <div style="flex-direction:column" class="parent">
            <div flex="60px"></div>
          </div>
        </div>
        "#,
    )
    .unwrap();
    let element = fixture.query_one("[flex]");
    let parent = fixture.query_one(".parent");

    fixture.assert_has_styles(element, &[("min-height", "60px")]);
    fixture.assert_has_styles(parent, &[("flex-direction", "column")]);
}

#[test]
fn test_auto_siblings_in_column() {
    let fixture = Fixture::new(
        r#"
        <div layout="column">
          <div flex="auto" flex.gt-sm="50"></div>
          <div flex="auto" flex.gt-sm="24.4"></div>
          <div flex="auto" flex.gt-sm="25.6"></div>
        </div>
        "#,
    )
    .unwrap();
    let nodes = fixture.query("[flex]");

    assert_eq!(nodes.len(), 3);
    fixture.assert_lacks_styles(nodes[1], &[("max-height", "*"), ("min-height", "*")]);
    fixture.assert_has_styles(
        nodes[1],
        &[("flex", "1 1 auto"), ("box-sizing", "border-box")],
    );
}

#[test]
fn test_same_element_layout_is_ignored() {
    expect_no_styles(
        r#"<div layout="column" flex="37%"></div>"#,
        &[("flex-direction", "row"), ("max-height", "37%")],
    );
    expect_styles(
        r#"<div layout="column" flex="37%"></div>"#,
        &[("max-width", "37%"), ("flex-direction", "column")],
    );
}

#[test]
fn test_percentage_in_column_parent() {
    let fixture = Fixture::new(
        r#"
        <div layout="column">
          <div flex="37%"></div>
        </div>
        "#,
    )
    .unwrap();
    fixture.assert_has_styles(fixture.query_one("[flex]"), &[("max-height", "37%")]);
}

// ============================================================================
// Responsive values
// ============================================================================

#[test]
fn test_largest_matching_breakpoint() {
    let mut fixture = Fixture::new(
        r#"
        <div flex="auto"
             flex.gt-xs="33%"
             flex.gt-sm="50%">
        </div>
        "#,
    )
    .unwrap();
    let el = fixture.first().unwrap();

    fixture.activate("xl", Some(true)).unwrap();
    fixture.assert_has_styles(el, &[("flex", "1 1 100%"), ("max-width", "50%")]);

    fixture.activate("sm", Some(true)).unwrap();
    fixture.assert_has_styles(el, &[("flex", "1 1 100%"), ("max-width", "33%")]);
}

#[test]
fn test_fallback_to_default_values() {
    let mut fixture = Fixture::new(
        r#"
        <div layout="column">
          <div flex="auto" flex.gt-sm="50"></div>
          <div flex="auto" flex.gt-sm="24.4"></div>
          <div flex="auto" flex.gt-sm="25.6"></div>
        </div>
        "#,
    )
    .unwrap();
    fixture.set_use_overlaps(true);
    let nodes = fixture.query("[flex]");
    assert_eq!(nodes.len(), 3);

    fixture.activate("sm", None).unwrap();
    for node in &nodes {
        fixture.assert_has_styles(*node, &[("flex", "1 1 auto")]);
    }

    fixture.activate("xl", None).unwrap();
    for (node, pct) in nodes.iter().zip(["50%", "24.4%", "25.6%"]) {
        fixture.assert_has_styles(*node, &[("flex", "1 1 100%"), ("max-height", pct)]);
    }

    fixture.activate("sm", None).unwrap();
    for node in &nodes {
        fixture.assert_has_styles(*node, &[("flex", "1 1 auto")]);
        fixture.assert_lacks_styles(*node, &[("max-height", "*"), ("min-height", "*")]);
    }
}

#[test]
fn test_fallback_from_gt_md() {
    let mut fixture = Fixture::new(
        r#"
        <div layout="column">
          <div flex="auto" flex.gt-md="50"></div>
          <div flex="auto" flex.gt-md="24.4"></div>
          <div flex="auto" flex.gt-md="25.6"></div>
        </div>
        "#,
    )
    .unwrap();
    fixture.set_use_overlaps(true);
    let nodes = fixture.query("[flex]");
    assert_eq!(nodes.len(), 3);

    fixture.activate("md", None).unwrap();
    for node in &nodes {
        fixture.assert_has_styles(*node, &[("flex", "1 1 auto")]);
    }

    fixture.activate("sm", None).unwrap();
    for node in &nodes {
        fixture.assert_has_styles(*node, &[("flex", "1 1 auto")]);
    }

    fixture.activate("lg", Some(true)).unwrap();
    for (node, pct) in nodes.iter().zip(["50%", "24.4%", "25.6%"]) {
        fixture.assert_has_styles(*node, &[("flex", "1 1 100%"), ("max-height", pct)]);
    }
}

#[test]
fn test_fallback_from_lt_md() {
    let mut fixture = Fixture::new(
        r#"
        <div layout="column">
          <div flex="auto" flex.lt-md="50"></div>
        </div>
        "#,
    )
    .unwrap();
    let nodes = fixture.query("[flex]");
    assert_eq!(nodes.len(), 1);
    let el = nodes[0];

    fixture.activate("md", Some(true)).unwrap();
    fixture.assert_has_styles(el, &[("flex", "1 1 auto")]);

    fixture.activate("sm", Some(true)).unwrap();
    fixture.assert_has_styles(el, &[("flex", "1 1 100%"), ("max-height", "50%")]);

    fixture.activate("lg", Some(true)).unwrap();
    fixture.assert_has_styles(el, &[("flex", "1 1 auto")]);
    fixture.assert_lacks_styles(el, &[("max-height", "*")]);
}

#[test]
fn test_clear_all_reverts_to_base() {
    let mut fixture = Fixture::new(r#"<div flex="1 0 20px" flex.md="0 0 300px"></div>"#).unwrap();
    let el = fixture.first().unwrap();

    fixture.activate("md", None).unwrap();
    fixture.assert_has_styles(el, &[("max-width", "300px"), ("min-width", "300px")]);
    assert_eq!(
        fixture.layout().flex_state(el),
        Some(ActiveState::Overridden("md".to_string()))
    );

    fixture.clear_all();
    fixture.assert_has_styles(el, &[("flex", "1 0 20px"), ("min-width", "20px")]);
    fixture.assert_lacks_styles(el, &[("max-width", "*")]);
    assert_eq!(fixture.layout().flex_state(el), Some(ActiveState::Base));
}

#[test]
fn test_responsive_layout_direction() {
    let mut fixture = Fixture::new(
        r#"
        <div layout="row" layout.lt-md="column" class="box">
          <div flex="1 0 120px"></div>
        </div>
        "#,
    )
    .unwrap();
    let parent = fixture.query_one(".box");
    let child = fixture.query_one("[flex]");
    fixture.assert_has_styles(child, &[("min-width", "120px")]);

    fixture.activate("sm", Some(true)).unwrap();
    fixture.assert_has_styles(parent, &[("flex-direction", "column")]);
    fixture.assert_has_styles(child, &[("min-height", "120px")]);
    fixture.assert_lacks_styles(child, &[("min-width", "*")]);

    fixture.activate("lg", Some(true)).unwrap();
    fixture.assert_has_styles(parent, &[("flex-direction", "row")]);
    fixture.assert_has_styles(child, &[("min-width", "120px")]);
}

#[test]
fn test_malformed_override_keeps_previous_styles() {
    let mut fixture = Fixture::new(r#"<div flex="30px" flex.md="x y z"></div>"#).unwrap();
    let el = fixture.first().unwrap();
    let before = fixture.styles(el);

    fixture.activate("md", None).unwrap();
    assert_eq!(fixture.styles(el), before);
}

#[test]
fn test_unbind_freezes_styles() {
    let mut fixture = Fixture::new(r#"<div flex="50" flex.md="20"></div>"#).unwrap();
    let el = fixture.first().unwrap();

    assert!(fixture.layout_mut().unbind(el));
    fixture.activate("md", None).unwrap();
    fixture.assert_has_styles(el, &[("max-width", "50%")]);
}

#[test]
fn test_set_attribute_updates_binding() {
    let mut fixture = Fixture::new(r#"<div flex="0 0 100px"></div>"#).unwrap();
    let el = fixture.first().unwrap();

    fixture.layout_mut().set_attribute(el, "flex", "nogrow");
    fixture.assert_has_styles(el, &[("flex", "0 1 auto")]);
    fixture.assert_lacks_styles(el, &[("min-width", "*"), ("max-width", "*")]);
}
