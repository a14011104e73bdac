//! Progress-ring geometry.
//!
//! ```ignore
//! use ring_engine::ring::{RingAssembly, RingConfig, default_segments};
//!
//! let assembly = RingAssembly::new(RingConfig::default())?;
//! let render_set = assembly.recompute(&default_segments())?;
//! for item in &render_set.meshes {
//!     upload(&item.mesh, item.color);
//! }
//! ```

mod assembly;
mod color;
mod config;
mod connector;
mod error;
mod layout;
mod section;
mod segment;

pub use assembly::{
    CONNECTOR_SAMPLES, RenderItem, RenderSet, RenderSetExport, RingAssembly, SegmentExport,
    assemble_ring,
};
pub use color::Rgb;
pub use config::{FractionPolicy, GapSpec, RadiusJitter, RingConfig, SectionProfile};
pub use connector::{
    CONTROL_LIFT, CONTROL_REACH, Connector, ConnectorExport, END_REACH, LABEL_FONT_SIZE,
    LABEL_OFFSET, Marker, build_connector, connector_curve,
};
pub use error::RingError;
pub use layout::{SegmentPlacement, allocate_arcs};
pub use section::{PROFILE_EDGES, SectionParams, mesh_ring_section, mesh_square_section};
pub use segment::{SegmentSpec, default_segments, random_segments};

#[cfg(test)]
mod tests;
