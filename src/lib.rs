//! segcanvas paints precomputed superpixel partitions into tagged segment annotations.
//!
//! A partition is a vector document of `sp<N>` shapes. The [`SegmentCanvas`] attaches one to an
//! explicit [`ShapeIndex`], routes pointer gestures through the [`EventLinker`] and keeps the
//! asset's [`Segment`] list in sync through two pathways:
//!
//! - incremental [`SegmentOffset`]s applied as each shape is painted or erased
//! - a full rescan of the painted surface when a gesture ends or the asset is switched
//!
//! Persistence and partition fetching sit behind the [`MetadataStore`] and [`PartitionSource`]
//! traits, with filesystem implementations for both.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

/// Segment aggregation engine.
pub mod aggregate;
/// Canvas lifecycle, session and grid.
pub mod canvas;
/// Canvas configuration.
pub mod config;
/// Segment record and overlay image export.
pub mod export;
/// Shared primitives and errors.
pub mod foundation;
/// Persisted data model.
pub mod model;
/// Paint mode and pointer handling.
pub mod paint;
/// Metadata and partition collaborators.
pub mod store;
/// Shape index and vector partitions.
pub mod surface;

pub use crate::aggregate::{
    ids::{SegmentIdGen, SequentialIds, UuidIds},
    offsets::project_segment_offsets,
    rescan::derive_segments_from_surface,
};
pub use crate::canvas::{
    grid::{GridOverlay, GridStyle},
    session::{CanvasNotice, ContentBox, LoadRequest, SegmentCanvas},
    state::{CanvasState, LoadTicket},
};
pub use crate::config::CanvasOpts;
pub use crate::foundation::core::{AssetId, BezPath, Point, Rect, ShapeId, Size};
pub use crate::foundation::error::{SegError, SegResult};
pub use crate::model::{
    metadata::{AssetInfo, AssetMetadata},
    segment::{Annotation, BoundingBox, Segment, SegmentOffset},
    tag::{Tag, TagRegistry},
};
pub use crate::paint::{
    linker::{Buttons, EventLinker, PointerEvent, PointerKind},
    mode::{PaintContext, SelectionMode},
    style::PaintStyle,
};
pub use crate::store::{
    metadata::{FsMetadataStore, InMemoryMetadataStore, MetadataStore},
    partition::{FsPartitionSource, InMemoryPartitionSource, PartitionSource},
};
pub use crate::surface::{index::ShapeIndex, partition::decode_partition};
