use super::*;
use crate::{
    foundation::core::{Rect, Size},
    model::metadata::AssetInfo,
    paint::style::PaintStyle,
    surface::shape::Shape,
};
use kurbo::Shape as _;

fn fixture() -> (AssetMetadata, ShapeIndex) {
    let style = PaintStyle::default();
    let mut index = ShapeIndex::new(Size::new(20.0, 10.0));
    index.insert(Shape::new(
        ShapeId(1),
        Rect::new(0.0, 0.0, 10.0, 10.0).to_path(0.1),
        &style,
    ));
    index.insert(Shape::new(
        ShapeId(2),
        Rect::new(10.0, 0.0, 20.0, 10.0).to_path(0.1),
        &style,
    ));

    let mut meta = AssetMetadata::empty(AssetInfo::bare(AssetId::new("img-7")));
    let mut fish = Segment::empty("s-fish", "fish");
    fish.superpixel.insert(ShapeId(2));
    fish.superpixel.insert(ShapeId(1));
    fish.area = 200.0;
    fish.bounding_box = BoundingBox::new(0.0, 0.0, 20.0, 10.0);
    let mut coral = Segment::empty("s-coral", "coral");
    coral.superpixel.insert(ShapeId(9));
    coral.area = 5.0;
    coral.category = Some("reef".to_string());
    coral.risk = "danger".to_string();
    meta.segments = vec![fish, coral];
    (meta, index)
}

#[test]
fn strict_record_shape() {
    let (meta, _) = fixture();
    let records = strict_records(&meta);
    assert_eq!(records.len(), 2);

    let json = serde_json::to_value(&records[0]).unwrap();
    assert_eq!(json["id"], "s-fish");
    assert_eq!(json["image_id"], "img-7");
    assert_eq!(json["category_id"], "fish");
    assert_eq!(json["segmentation_method_id"], 0);
    assert_eq!(json["superpixel"], serde_json::json!([1, 2]));
    assert_eq!(json["bbox"]["width"], 20.0);
    assert_eq!(json["iscrowd"], 0);
    assert_eq!(json["risk"], "safe");

    assert_eq!(records[1].category_id, "reef");
    assert_eq!(records[1].risk, "danger");
}

#[test]
fn polygon_records_resolve_geometry() {
    let (meta, index) = fixture();
    let records = polygon_records(&meta.segments, &index);

    assert_eq!(records[0].id, 0);
    assert!(!records[0].isthing);
    assert_eq!(records[0].polygon.len(), 2);
    assert!(records[0].polygon[0].contains(&[0.0, 0.0]));
    assert!(records[0].polygon[1].contains(&[20.0, 10.0]));

    // Shape 9 has no geometry.
    assert_eq!(records[1].id, 1);
    assert!(records[1].polygon.is_empty());
    assert_eq!(records[1].area, 5.0);
}

#[test]
fn export_file_name_replaces_whitespace() {
    assert_eq!(
        segments_export_file_name("reef shot 1.jpg"),
        "reef-shot-1.jpg_PS_data.json"
    );
}
