//! Full ring recompute: layout, one mesh per segment, one connector per
//! segment.
//!
//! A recompute either returns a complete [`RenderSet`] or a [`RingError`];
//! configuration problems never produce partial geometry. Degenerate
//! segments come back as empty meshes with the reason in their diagnostics.

use serde::Serialize;

use crate::geom::{Mesh, MeshDiagnostics, RingMetrics, RingTimingReport, TimingBucket};

use super::connector::ConnectorExport;
use super::section::{SectionParams, mesh_ring_section, mesh_square_section};
use super::{
    Connector, RingConfig, RingError, Rgb, SectionProfile, SegmentPlacement, SegmentSpec,
    allocate_arcs, build_connector,
};

/// Polyline resolution of exported connectors.
pub const CONNECTOR_SAMPLES: usize = 32;

/// One coloured segment mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderItem {
    pub index: usize,
    pub mesh: Mesh,
    pub color: Rgb,
    pub diagnostics: MeshDiagnostics,
}

/// Everything a renderer and a label layer need for one ring.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderSet {
    pub placements: Vec<SegmentPlacement>,
    pub meshes: Vec<RenderItem>,
    pub annotations: Vec<Connector>,
    /// All segment diagnostics merged.
    pub diagnostics: MeshDiagnostics,
    pub timing: Option<RingTimingReport>,
}

impl RenderSet {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.placements.len()
    }

    /// Flat buffers per segment, ready for `serde` consumers.
    #[must_use]
    pub fn export(&self) -> RenderSetExport {
        let segments = self
            .placements
            .iter()
            .zip(&self.meshes)
            .zip(&self.annotations)
            .map(|((placement, item), connector)| SegmentExport {
                index: placement.index,
                positions: item.mesh.positions_f32(),
                normals: item.mesh.normals_f32(),
                indices: item.mesh.indices.clone(),
                color: item.color.to_array(),
                color_hex: item.color.to_hex(),
                start_angle: placement.start_angle,
                arc_length: placement.arc_length,
                center_angle: placement.center_angle,
                anchor: placement.anchor_point.to_array(),
                diagnostics: item.diagnostics.clone(),
                connector: ConnectorExport::from_connector(connector, CONNECTOR_SAMPLES),
            })
            .collect();

        RenderSetExport {
            segments,
            vertex_count: self.diagnostics.vertex_count,
            triangle_count: self.diagnostics.triangle_count,
            warnings: self.diagnostics.warnings.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentExport {
    pub index: usize,
    pub positions: Vec<f32>,
    pub normals: Vec<f32>,
    pub indices: Vec<u32>,
    pub color: [f64; 3],
    pub color_hex: String,
    pub start_angle: f64,
    pub arc_length: f64,
    pub center_angle: f64,
    pub anchor: [f64; 3],
    pub diagnostics: MeshDiagnostics,
    pub connector: ConnectorExport,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderSetExport {
    pub segments: Vec<SegmentExport>,
    pub vertex_count: usize,
    pub triangle_count: usize,
    pub warnings: Vec<String>,
}

/// A validated configuration that turns segment lists into render sets.
#[derive(Debug, Clone, PartialEq)]
pub struct RingAssembly {
    config: RingConfig,
}

impl RingAssembly {
    pub fn new(config: RingConfig) -> Result<Self, RingError> {
        config.validate()?;
        Ok(Self { config })
    }

    #[must_use]
    pub fn config(&self) -> &RingConfig {
        &self.config
    }

    /// Rebuilds placements, meshes and connectors from scratch.
    ///
    /// Same segments and configuration (with seeded or disabled jitter) give
    /// identical buffers.
    pub fn recompute(&self, segments: &[SegmentSpec]) -> Result<RenderSet, RingError> {
        let mut metrics = RingMetrics::default();
        metrics.begin();

        let gap = self.config.gap_spec();
        let placements = metrics.time(TimingBucket::Layout, || {
            allocate_arcs(segments, &gap, &self.config)
        })?;

        let mut diagnostics = MeshDiagnostics::new();
        let meshes: Vec<RenderItem> = self
            .mesh_placements(&placements)
            .into_iter()
            .zip(&placements)
            .map(|((mesh, segment_diagnostics), placement)| {
                metrics.absorb(segment_diagnostics.timing.as_ref());
                diagnostics.merge(&segment_diagnostics);
                RenderItem {
                    index: placement.index,
                    mesh,
                    color: placement.color,
                    diagnostics: segment_diagnostics,
                }
            })
            .collect();

        let length = self.config.connector_length;
        let annotations: Vec<Connector> = metrics.time(TimingBucket::Connectors, || {
            placements
                .iter()
                .map(|placement| build_connector(placement, length))
                .collect()
        });

        log::debug!(
            "ring recomputed: {} segments, {}",
            placements.len(),
            diagnostics.summary()
        );

        let timing = metrics.end();
        diagnostics.timing.clone_from(&timing);
        Ok(RenderSet {
            placements,
            meshes,
            annotations,
            diagnostics,
            timing,
        })
    }

    fn mesh_placements(&self, placements: &[SegmentPlacement]) -> Vec<(Mesh, MeshDiagnostics)> {
        let build = |placement: &SegmentPlacement| self.mesh_placement(placement);

        #[cfg(feature = "parallel")]
        {
            if self.config.parallel {
                use rayon::prelude::*;
                return placements.par_iter().map(build).collect();
            }
        }

        placements.iter().map(build).collect()
    }

    fn mesh_placement(&self, placement: &SegmentPlacement) -> (Mesh, MeshDiagnostics) {
        let params = SectionParams::for_placement(placement, &self.config);
        match self.config.profile {
            SectionProfile::Detailed => mesh_ring_section(&params),
            SectionProfile::Square => mesh_square_section(&params),
        }
    }
}

/// Validates `config` and recomputes `segments` in one call.
pub fn assemble_ring(segments: &[SegmentSpec], config: &RingConfig) -> Result<RenderSet, RingError> {
    RingAssembly::new(config.clone())?.recompute(segments)
}
