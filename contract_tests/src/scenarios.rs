//! End-to-end batch scenarios with their expected host trees

#[cfg(test)]
mod tests {
    use crate::test_helpers::*;
    use host_tree::{EventClass, MutationRecord};
    use render_types::{ComponentId, RawEdit, RawFrame, RenderBatch};
    use services_render_host::RenderError;

    fn render(harness: &mut Harness, frames: Vec<RawFrame>, edits: Vec<RawEdit>) -> Result<(), RenderError> {
        let batch = RenderBatch::new(frames).with_diff(ROOT_COMPONENT, edits);
        harness.host.render_batch(RENDERER, &batch)
    }

    #[test]
    fn test_n_prepends_yield_n_children_in_order() {
        for n in 0..12 {
            let mut harness = Harness::new();
            let frames: Vec<RawFrame> = (0..n)
                .map(|i| {
                    if i % 2 == 0 {
                        RawFrame::element(format!("e{}", i), 0)
                    } else {
                        RawFrame::text(format!("t{}", i))
                    }
                })
                .collect();
            let edits: Vec<RawEdit> = (0..n).map(|i| RawEdit::prepend_frame(i, i)).collect();

            render(&mut harness, frames, edits).unwrap();

            let children = harness.host.tree().children(harness.mount).to_vec();
            assert_eq!(children.len(), n);
            for (i, child) in children.iter().enumerate() {
                if i % 2 == 0 {
                    let expected = format!("e{}", i);
                    assert_eq!(harness.host.tree().element_name(*child), Some(expected.as_str()));
                } else {
                    let expected = format!("t{}", i);
                    assert_eq!(harness.host.tree().text(*child), Some(expected.as_str()));
                }
            }
        }
    }

    #[test]
    fn test_element_with_attribute_and_text() {
        let mut harness = Harness::new();
        harness
            .render_json(
                r#"{
                    "referenceFrames": [
                        {"frameType": 1, "elementName": "div", "descendantsEndIndex": 2},
                        {"frameType": 3, "attributeName": "class", "attributeValue": "x"},
                        {"frameType": 2, "textContent": "hi"}
                    ],
                    "edits": [{"editType": 1, "siblingIndex": 0, "newTreeIndex": 0}],
                    "updatedComponents": [{"componentId": 0, "editsOffset": 0, "editsCount": 1}]
                }"#,
            )
            .unwrap();

        assert_eq!(harness.markup(), r#"<div class="x">hi</div>"#);
    }

    #[test]
    fn test_remove_frame_empties_mount() {
        let mut harness = Harness::new();
        let frames = vec![RawFrame::element("span", 0)];
        render(&mut harness, frames.clone(), vec![RawEdit::prepend_frame(0, 0)]).unwrap();
        assert_eq!(harness.host.tree().children(harness.mount).len(), 1);

        render(&mut harness, frames, vec![RawEdit::remove_frame(0)]).unwrap();

        assert!(harness.host.tree().children(harness.mount).is_empty());
    }

    #[test]
    fn test_step_in_update_text_step_out() {
        let mut harness = Harness::new();
        let frames = vec![
            RawFrame::element("label", 1),
            RawFrame::text("old"),
            RawFrame::text("new"),
            RawFrame::element("hr", 3),
        ];
        render(&mut harness, frames.clone(), vec![RawEdit::prepend_frame(0, 0)]).unwrap();

        render(
            &mut harness,
            frames,
            vec![
                RawEdit::step_in(0),
                RawEdit::update_text(0, 2),
                RawEdit::step_out(),
                RawEdit::prepend_frame(1, 3),
            ],
        )
        .unwrap();

        assert_eq!(harness.markup(), "<label>new</label><hr></hr>");
    }

    #[test]
    fn test_balanced_scopes_return_to_start() {
        let mut harness = Harness::new();
        let frames = vec![
            RawFrame::element("a", 2),
            RawFrame::element("b", 2),
            RawFrame::text("x"),
            RawFrame::text("y"),
        ];
        render(&mut harness, frames.clone(), vec![RawEdit::prepend_frame(0, 0)]).unwrap();

        for depth in 1..=2 {
            // Each earlier round prepended one "y" before <a>.
            let mut edits = vec![RawEdit::step_in(depth - 1)];
            edits.extend((1..depth).map(|_| RawEdit::step_in(0)));
            edits.extend((0..depth).map(|_| RawEdit::step_out()));
            // Lands at the mount scope only if the cursor came all the way back.
            edits.push(RawEdit::prepend_frame(0, 3));
            render(&mut harness, frames.clone(), edits).unwrap();
        }

        assert_eq!(harness.markup(), "yy<a><b>x</b></a>");
    }

    #[test]
    fn test_unbalanced_scopes_fail() {
        let mut harness = Harness::new();
        let frames = vec![RawFrame::element("a", 0)];
        render(&mut harness, frames.clone(), vec![RawEdit::prepend_frame(0, 0)]).unwrap();

        assert!(matches!(
            render(&mut harness, frames.clone(), vec![RawEdit::step_in(0)]),
            Err(RenderError::UnbalancedScope { .. })
        ));
        assert!(matches!(
            render(
                &mut harness,
                frames,
                vec![RawEdit::step_in(0), RawEdit::step_out(), RawEdit::step_out()]
            ),
            Err(RenderError::UnbalancedScope { edit_index: 2, .. })
        ));
    }

    #[test]
    fn test_listener_rebinding_leaves_one_listener() {
        let mut harness = Harness::new();
        let frames = vec![
            RawFrame::element("input", 1),
            RawFrame::attribute("onkeypress", ""),
        ];
        render(&mut harness, frames.clone(), vec![RawEdit::prepend_frame(0, 0)]).unwrap();

        render(
            &mut harness,
            frames,
            vec![RawEdit::set_attribute(0, 1), RawEdit::set_attribute(0, 1)],
        )
        .unwrap();

        let input = harness.host.tree().children(harness.mount)[0];
        assert_eq!(
            harness.host.tree().listener_count(input, EventClass::KeyPress),
            1
        );
    }

    #[test]
    fn test_component_materialization_is_deferred() {
        let mut harness = Harness::new();
        let child = ComponentId::new(11);
        render(
            &mut harness,
            vec![RawFrame::component(child, 0)],
            vec![RawEdit::prepend_frame(0, 0)],
        )
        .unwrap();

        let container = harness
            .host
            .renderer(RENDERER)
            .unwrap()
            .registry()
            .resolve(child)
            .unwrap();
        assert!(harness.host.tree().children(container).is_empty());
        assert!(!harness
            .host
            .tree()
            .mutations()
            .iter()
            .any(|record| record.target() == Some(container)));
    }

    #[test]
    fn test_nested_component_range_not_redescended() {
        let mut harness = Harness::new();
        let frames = vec![
            RawFrame::element("div", 5),
            RawFrame::component(ComponentId::new(2), 4),
            RawFrame::attribute("label", "parameter"),
            RawFrame::element("ignored", 4),
            RawFrame::text("ignored"),
            RawFrame::text("sibling"),
        ];

        render(&mut harness, frames, vec![RawEdit::prepend_frame(0, 0)]).unwrap();

        assert_eq!(
            harness.markup(),
            "<div><component-host></component-host>sibling</div>"
        );
        let created = harness
            .host
            .tree()
            .mutations()
            .iter()
            .filter(|record| {
                matches!(
                    record,
                    MutationRecord::CreateElement { .. } | MutationRecord::CreateText { .. }
                )
            })
            .count();
        // Mount setup plus div, container and the sibling text.
        assert_eq!(created, 4);
    }
}
