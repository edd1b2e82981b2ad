//! CP-net to DOT (Graphviz) conversion.
//!
//! The dependency graph of a [`CpNet`] is rendered as a digraph with one node
//! per feature and one edge per parent. Roots (features without parents) are
//! grouped at the top rank.
//!
//! # Examples
//!
//! ```
//! use gencpnet::generator::{generate, GeneratorConfig};
//!
//! let mut config = GeneratorConfig::new(5);
//! config.seed = Some(1);
//! let net = generate(config).unwrap().remove(0);
//!
//! let dot = net.to_dot().unwrap();
//! assert!(dot.starts_with("digraph {"));
//! // Render with: dot -Tpng net.dot -o net.png
//! ```

use std::fmt::Write as _;

use crate::cpnet::CpNet;

/// Configuration options for DOT output generation.
///
/// ```
/// use gencpnet::dot::DotConfig;
///
/// let config = DotConfig {
///     show_cpts: true,
///     ..DotConfig::default()
/// };
/// assert_eq!(config.node_shape, "circle");
/// ```
#[derive(Debug, Clone)]
pub struct DotConfig {
    /// Shape for feature nodes without a table label (default: "circle")
    pub node_shape: &'static str,
    /// Shape for root features (default: "doublecircle")
    pub root_shape: &'static str,
    /// Style for dependency edges (default: "solid")
    pub edge_style: &'static str,
    /// Whether to use HTML labels for subscripts (default: true)
    pub use_html_labels: bool,
    /// Whether to attach each feature's CPT to its label (default: false)
    pub show_cpts: bool,
}

impl Default for DotConfig {
    fn default() -> Self {
        Self {
            node_shape: "circle",
            root_shape: "doublecircle",
            edge_style: "solid",
            use_html_labels: true,
            show_cpts: false,
        }
    }
}

impl CpNet {
    /// Converts the dependency graph to DOT format.
    pub fn to_dot(&self) -> Result<String, std::fmt::Error> {
        self.to_dot_with_config(&DotConfig::default())
    }

    /// Converts the dependency graph to DOT format with custom configuration.
    ///
    /// With [`DotConfig::show_cpts`] every node becomes a box listing its
    /// present rows as `parent values: order`, values numbered from 1.
    pub fn to_dot_with_config(&self, config: &DotConfig) -> Result<String, std::fmt::Error> {
        let mut dot = String::new();
        writeln!(dot, "digraph {{")?;
        writeln!(dot, "node [shape={}];", config.node_shape)?;

        // Roots on top
        writeln!(dot, "{{ rank=source")?;
        for node in self.nodes().iter().filter(|node| node.indegree() == 0) {
            writeln!(dot, "{} [shape={}];", node.feature(), config.root_shape)?;
        }
        writeln!(dot, "}}")?;

        for node in self.nodes() {
            let name = if config.use_html_labels {
                format!("x<SUB>{}</SUB>", node.feature() + 1)
            } else {
                format!("x{}", node.feature() + 1)
            };
            if config.show_cpts {
                let mut rows = String::new();
                for (key, order) in node.cpt().rows() {
                    let Some(order) = order else { continue };
                    let key: Vec<String> = key.iter().map(|v| (v + 1).to_string()).collect();
                    let order: Vec<String> = order.iter().map(|v| (v + 1).to_string()).collect();
                    if key.is_empty() {
                        write!(rows, "{}\\l", order.join(" &gt; "))?;
                    } else {
                        write!(rows, "{}: {}\\l", key.join(","), order.join(" &gt; "))?;
                    }
                }
                if config.use_html_labels {
                    let rows = rows.replace("\\l", "<BR ALIGN=\"LEFT\"/>");
                    writeln!(dot, "{} [shape=box, label=<{}<BR/>{}>];", node.feature(), name, rows)?;
                } else {
                    let rows = rows.replace("&gt;", ">");
                    writeln!(dot, "{} [shape=box, label=\"{}\\n{}\"];", node.feature(), name, rows)?;
                }
            } else if config.use_html_labels {
                writeln!(dot, "{} [label=<{}>];", node.feature(), name)?;
            } else {
                writeln!(dot, "{} [label=\"{}\"];", node.feature(), name)?;
            }
        }

        for (parent, child) in self.edges() {
            writeln!(dot, "{} -> {} [style={}];", parent, child, config.edge_style)?;
        }

        writeln!(dot, "}}")?;
        Ok(dot)
    }
}
