//! Style-key resolution and the bundled stylesheets.
//!
//! The layout engine and geometry builders only ever produce logical
//! style keys; every color and font lives in a stylesheet. The bundled
//! sheets are compiled into the binary and assembled once per chart
//! family.

use std::sync::LazyLock;

/// A resolved style: CSS class name plus optional inline declarations.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedStyle {
    pub class: String,
    pub inline: Option<String>,
}

/// Maps logical style keys ("fill1", "dataPoint3", "key2") to CSS
/// classes, and selects the fill key for a (dataset, field) cell.
///
/// The default implementations reproduce the bundled stylesheet's
/// naming; a custom resolver can re-route keys or attach inline
/// declarations without the charts knowing.
pub trait StyleResolver: Send + Sync {
    /// Resolve a logical key to a class, optionally with inline style.
    fn resolve(&self, key: &str) -> ResolvedStyle {
        ResolvedStyle {
            class: key.to_string(),
            inline: None,
        }
    }

    /// Fill key for the given dataset and field indices.
    fn fill_key(&self, dataset: usize, _field: usize) -> String {
        format!("fill{}", dataset + 1)
    }

    /// Line key for a dataset.
    fn line_key(&self, dataset: usize) -> String {
        format!("line{}", dataset + 1)
    }

    /// Data-point key for a dataset.
    fn point_key(&self, dataset: usize) -> String {
        format!("dataPoint{}", dataset + 1)
    }

    /// Legend box key for a dataset.
    fn key_key(&self, index: usize) -> String {
        format!("key{}", index + 1)
    }
}

/// The built-in resolver: identity keys over the bundled stylesheets.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultStyles;

impl StyleResolver for DefaultStyles {}

static GRAPH_CSS: &str = include_str!("../resources/graph.css");
static BAR_CSS: &str = include_str!("../resources/bar.css");
static PLOT_CSS: &str = include_str!("../resources/plot.css");
static PIE_CSS: &str = include_str!("../resources/pie.css");

static BAR_SHEET: LazyLock<String> = LazyLock::new(|| [GRAPH_CSS, BAR_CSS].concat());
static PLOT_SHEET: LazyLock<String> = LazyLock::new(|| [GRAPH_CSS, PLOT_CSS].concat());
static PIE_SHEET: LazyLock<String> = LazyLock::new(|| [GRAPH_CSS, PIE_CSS].concat());

/// Frame-only styles (background, axes, titles, labels).
pub fn base_stylesheet() -> &'static str {
    GRAPH_CSS
}

/// Stylesheet for bar and schedule charts.
pub fn bar_stylesheet() -> &'static str {
    &BAR_SHEET
}

/// Stylesheet for line, plot and time-series charts.
pub fn plot_stylesheet() -> &'static str {
    &PLOT_SHEET
}

/// Stylesheet for pie charts.
pub fn pie_stylesheet() -> &'static str {
    &PIE_SHEET
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_keys_are_one_based() {
        let styles = DefaultStyles;
        assert_eq!(styles.fill_key(0, 3), "fill1");
        assert_eq!(styles.line_key(2), "line3");
        assert_eq!(styles.key_key(11), "key12");
    }

    #[test]
    fn resolve_is_identity_by_default() {
        let resolved = DefaultStyles.resolve("dataPointLabel");
        assert_eq!(resolved.class, "dataPointLabel");
        assert!(resolved.inline.is_none());
    }

    #[test]
    fn sheets_carry_their_families() {
        assert!(bar_stylesheet().contains(".fill12"));
        assert!(plot_stylesheet().contains(".line12"));
        assert!(pie_stylesheet().contains(".fill12"));
        assert!(bar_stylesheet().contains(".svgBackground"));
    }
}
