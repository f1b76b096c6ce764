use super::*;

#[test]
fn bounding_box_rect_conversion() {
    let bb = BoundingBox::from_rect(Rect::new(10.0, 20.0, 4.0, 2.0));
    assert_eq!(bb, BoundingBox::new(4.0, 2.0, 6.0, 18.0));
    assert_eq!(bb.to_rect(), Rect::new(4.0, 2.0, 10.0, 20.0));
    assert!(bb.contains_rect(Rect::new(4.0, 2.0, 10.0, 20.0)));
    assert!(!bb.contains_rect(Rect::new(3.9, 2.0, 10.0, 20.0)));
}

#[test]
fn segment_json_uses_persisted_field_names() {
    let mut seg = Segment::empty("abc", "fish");
    seg.superpixel.insert(ShapeId(3));
    seg.superpixel.insert(ShapeId(1));
    seg.area = 25.0;

    let v = serde_json::to_value(&seg).unwrap();
    assert_eq!(v["superpixel"], serde_json::json!([1, 3]));
    assert!(v.get("boundingBox").is_some());
    assert_eq!(v["risk"], "safe");
    assert!(v.get("category").is_none());
}

#[test]
fn segment_defaults_fill_missing_fields() {
    let json = r#"{ "id": "x", "tag": "coral", "superpixel": [5], "area": 12 }"#;
    let seg: Segment = serde_json::from_str(json).unwrap();
    assert_eq!(seg.iscrowd, 0);
    assert_eq!(seg.risk, DEFAULT_RISK);
    assert_eq!(seg.bounding_box, BoundingBox::default());
    assert!(seg.contains(ShapeId(5)));
}

#[test]
fn offset_tag_maps_sentinel() {
    assert_eq!(OffsetTag::from_raw("deannotating"), OffsetTag::Deannotate);
    assert_eq!(
        OffsetTag::from_raw("fish"),
        OffsetTag::Annotate("fish".to_string())
    );
    assert_eq!(OffsetTag::Deannotate.as_str(), DEANNOTATING_TAG);
}
