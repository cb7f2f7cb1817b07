//! Presentation-quality SVG charts from tabular data.
//!
//! Bar, line, pie, XY plot, time-series and schedule charts share one
//! layout engine: datasets flow through range resolution, scale and
//! tick construction, plot-area layout and geometry building before a
//! chart assembles the final markup. Styling is class-based; the
//! bundled stylesheets cover twelve data series and can be replaced
//! wholesale per chart.
//!
//! ```
//! use svgplot::{Bar, Chart, Dataset};
//!
//! let mut chart = Bar::vertical(["Jan", "Feb", "Mar"]);
//! chart.add_data(Dataset::from_values("Sales 2002", [12.0, 45.0, 21.0]))?;
//! let svg = chart.render()?;
//! assert!(svg.starts_with("<svg"));
//! # Ok::<(), svgplot::ChartError>(())
//! ```

pub mod chart;
pub mod config;
pub mod data;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod markup;
pub mod range;
pub mod scale;
pub mod style;
pub mod ticks;

pub use chart::{
    default_root_attributes, Bar, Chart, DrawHook, Line, Orientation, Pie, Plot, RenderStage,
    RootAttributesFn, Schedule, TimeSeries,
};
pub use chart::schedule::Task;
pub use chart::time_series::parse_date;
pub use config::{GraphConfig, KeyPosition, TitleDirection};
pub use data::{Axis, Dataset, Point};
pub use error::{ChartError, ChartResult};
pub use geometry::{BarStack, GeometryPrimitive, PointLabel};
pub use layout::PlotArea;
pub use markup::Element;
pub use range::{AxisRange, RangeOptions};
pub use scale::ScaleTransform;
pub use style::{DefaultStyles, ResolvedStyle, StyleResolver};
pub use ticks::{CalendarUnit, Tick, TickFormat, TimeInterval};

/// Convenient imports for chart construction.
pub mod prelude {
    pub use crate::chart::{Bar, Chart, Line, Pie, Plot, RenderStage, Schedule, TimeSeries};
    pub use crate::config::{GraphConfig, KeyPosition};
    pub use crate::data::{Dataset, Point};
    pub use crate::error::{ChartError, ChartResult};
    pub use crate::geometry::BarStack;
    pub use crate::style::{DefaultStyles, StyleResolver};
}
