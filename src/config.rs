//! Run configuration.
//!
//! A run is described by one [`Configuration`], read from an optional JSON file
//! and then overridden by the command line. Every field has a default, so an
//! empty object (or no file at all) is a valid configuration.

use crate::error::{Result, SocialMapError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Centrality algorithm used to rank nodes before anchoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CentralitySelect {
    Betweenness,
    Load,
    Eigenvector,
    None,
}

/// General layout algorithm that places every node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutSelect {
    /// Fruchterman-Reingold force-directed layout
    #[serde(alias = "force-directed", alias = "fruchterman-reingold")]
    Spring,
    KamadaKawai,
    Spectral,
    Spiral,
    Circular,
}

impl LayoutSelect {
    pub fn name(&self) -> &'static str {
        match self {
            LayoutSelect::Spring => "spring",
            LayoutSelect::KamadaKawai => "kamada-kawai",
            LayoutSelect::Spectral => "spectral",
            LayoutSelect::Spiral => "spiral",
            LayoutSelect::Circular => "circular",
        }
    }
}

/// Values handed to the renderer untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderHints {
    #[serde(default = "default_graph_title")]
    pub graph_title: String,

    #[serde(default = "default_graph_node_size")]
    pub graph_node_size: u32,

    #[serde(default = "default_graph_node_color")]
    pub graph_node_color: String,

    #[serde(default = "default_graph_node_border")]
    pub graph_node_border: f64,

    /// Percentage, 0 = opaque
    #[serde(default = "default_node_transparency")]
    pub node_transparency: u8,

    #[serde(default = "default_font_size")]
    pub font_size: u32,
}

impl Default for RenderHints {
    fn default() -> Self {
        Self {
            graph_title: default_graph_title(),
            graph_node_size: default_graph_node_size(),
            graph_node_color: default_graph_node_color(),
            graph_node_border: default_graph_node_border(),
            node_transparency: default_node_transparency(),
            font_size: default_font_size(),
        }
    }
}

impl RenderHints {
    /// Node opacity in `[0, 1]` as drawing surfaces expect it.
    pub fn alpha(&self) -> f64 {
        f64::from(100 - self.node_transparency.min(100)) / 100.0
    }
}

fn default_graph_title() -> String {
    "Social Map".to_string()
}

fn default_graph_node_size() -> u32 {
    2000
}

fn default_graph_node_color() -> String {
    "white".to_string()
}

fn default_graph_node_border() -> f64 {
    1.0
}

fn default_node_transparency() -> u8 {
    40
}

fn default_font_size() -> u32 {
    8
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    #[serde(default = "default_source_file")]
    pub source_file: PathBuf,

    #[serde(default)]
    pub graph_directional: bool,

    #[serde(default = "default_display_threshold")]
    pub display_threshold: i64,

    #[serde(default = "default_centrality_select")]
    pub centrality_select: CentralitySelect,

    #[serde(default)]
    pub centrality_nodes: usize,

    #[serde(default = "default_layout_select")]
    pub layout_select: LayoutSelect,

    #[serde(default = "default_graph_scale")]
    pub graph_scale: f64,

    #[serde(default = "default_graph_dimensions")]
    pub graph_dimensions: usize,

    #[serde(default = "default_edge_weight_factor")]
    pub edge_weight_factor: f64,

    /// Seed for randomized layouts; `None` draws one from the OS.
    #[serde(default)]
    pub layout_seed: Option<u64>,

    #[serde(flatten)]
    pub render: RenderHints,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            source_file: default_source_file(),
            graph_directional: false,
            display_threshold: default_display_threshold(),
            centrality_select: default_centrality_select(),
            centrality_nodes: 0,
            layout_select: default_layout_select(),
            graph_scale: default_graph_scale(),
            graph_dimensions: default_graph_dimensions(),
            edge_weight_factor: default_edge_weight_factor(),
            layout_seed: None,
            render: RenderHints::default(),
        }
    }
}

fn default_source_file() -> PathBuf {
    PathBuf::from("test-data.csv")
}

fn default_display_threshold() -> i64 {
    1
}

fn default_centrality_select() -> CentralitySelect {
    CentralitySelect::Betweenness
}

fn default_layout_select() -> LayoutSelect {
    LayoutSelect::Spring
}

fn default_graph_scale() -> f64 {
    100.0
}

fn default_graph_dimensions() -> usize {
    2
}

fn default_edge_weight_factor() -> f64 {
    2.1
}

pub const MAX_CENTRALITY_NODES: usize = 4;

impl Configuration {
    /// Reads a JSON configuration file, or the defaults when `path` is `None`.
    ///
    /// The result is not validated yet; callers apply their overrides first and
    /// then call [`Configuration::validate`].
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let content = fs::read_to_string(path).map_err(|source| SocialMapError::Io {
            source,
            path: path.to_path_buf(),
        })?;

        Ok(serde_json::from_str(&content)?)
    }

    /// Checks every tunable against its allowed range.
    ///
    /// # Errors
    /// Returns [`SocialMapError::Config`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        check_range("display_threshold", self.display_threshold, 1, 1000)?;
        check_range(
            "centrality_nodes",
            self.centrality_nodes,
            0,
            MAX_CENTRALITY_NODES,
        )?;
        check_range("graph_dimensions", self.graph_dimensions, 1, 3)?;
        check_range("edge_weight_factor", self.edge_weight_factor, 1.1, 4.0)?;

        if !self.graph_scale.is_finite() || self.graph_scale <= 0.0 {
            return Err(SocialMapError::Config(format!(
                "graph_scale must be a positive number, got {}",
                self.graph_scale
            )));
        }

        match self.layout_select {
            LayoutSelect::Spiral if self.graph_dimensions != 2 => {
                return Err(SocialMapError::Config(
                    "spiral layout is only defined in 2 dimensions".to_string(),
                ));
            }
            LayoutSelect::Circular if self.graph_dimensions < 2 => {
                return Err(SocialMapError::Config(
                    "circular layout needs at least 2 dimensions".to_string(),
                ));
            }
            _ => {}
        }

        let render = &self.render;
        check_range("graph_node_size", render.graph_node_size, 1000, 5000)?;
        check_range("node_transparency", render.node_transparency, 0, 100)?;
        check_range("font_size", render.font_size, 6, 64)?;

        if !render.graph_node_border.is_finite() || render.graph_node_border < 0.0 {
            return Err(SocialMapError::Config(format!(
                "graph_node_border must be non-negative, got {}",
                render.graph_node_border
            )));
        }

        Ok(())
    }
}

fn check_range<T>(name: &str, value: T, min: T, max: T) -> Result<()>
where
    T: PartialOrd + std::fmt::Display,
{
    if value < min || value > max {
        return Err(SocialMapError::Config(format!(
            "{name} must be within {min} - {max}, got {value}"
        )));
    }
    Ok(())
}
