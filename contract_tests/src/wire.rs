//! Frame and edit wire contracts
//!
//! Discriminators and field names are shared with the producer runtime and
//! MUST NOT CHANGE without a coordinated format bump.

#[cfg(test)]
mod tests {
    use render_types::{
        ComponentId, EditKind, FrameKind, RawEdit, RawFrame, RenderBatch,
    };
    use serde_json::json;

    #[test]
    fn test_frame_discriminators_are_stable() {
        assert_eq!(FrameKind::Element.discriminator(), 1);
        assert_eq!(FrameKind::Text.discriminator(), 2);
        assert_eq!(FrameKind::Attribute.discriminator(), 3);
        assert_eq!(FrameKind::Component.discriminator(), 4);
    }

    #[test]
    fn test_edit_discriminators_are_stable() {
        assert_eq!(EditKind::PrependFrame.discriminator(), 1);
        assert_eq!(EditKind::RemoveFrame.discriminator(), 2);
        assert_eq!(EditKind::SetAttribute.discriminator(), 3);
        assert_eq!(EditKind::RemoveAttribute.discriminator(), 4);
        assert_eq!(EditKind::UpdateText.discriminator(), 5);
        assert_eq!(EditKind::StepIn.discriminator(), 6);
        assert_eq!(EditKind::StepOut.discriminator(), 7);
    }

    #[test]
    fn test_frame_field_names() {
        assert_eq!(
            serde_json::to_value(RawFrame::element("div", 3)).unwrap(),
            json!({"frameType": 1, "elementName": "div", "descendantsEndIndex": 3})
        );
        assert_eq!(
            serde_json::to_value(RawFrame::component(ComponentId::new(8), 9)).unwrap(),
            json!({"frameType": 4, "componentId": 8, "descendantsEndIndex": 9})
        );
        assert_eq!(
            serde_json::to_value(RawFrame::text("t")).unwrap(),
            json!({"frameType": 2, "textContent": "t", "descendantsEndIndex": 0})
        );
    }

    #[test]
    fn test_edit_field_names() {
        assert_eq!(
            serde_json::to_value(RawEdit::set_attribute(1, 2)).unwrap(),
            json!({"editType": 3, "siblingIndex": 1, "newTreeIndex": 2})
        );
        assert_eq!(
            serde_json::to_value(RawEdit::remove_attribute(0, "class")).unwrap(),
            json!({"editType": 4, "siblingIndex": 0, "removedAttributeName": "class"})
        );
    }

    #[test]
    fn test_batch_field_names() {
        let batch = RenderBatch::new(Vec::new())
            .with_diff(ComponentId::new(2), vec![RawEdit::step_out()])
            .with_disposed(ComponentId::new(3));
        let value = serde_json::to_value(&batch).unwrap();

        assert_eq!(
            value["updatedComponents"][0],
            json!({"componentId": 2, "editsOffset": 0, "editsCount": 1})
        );
        assert_eq!(value["disposedComponentIds"], json!([3]));
        assert!(value["referenceFrames"].is_array());
        assert!(value["edits"].is_array());
    }
}
