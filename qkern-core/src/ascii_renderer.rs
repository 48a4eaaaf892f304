//! Text diagram renderer for terminal output
//!
//! One horizontal wire per qubit, one column per gate or measurement.
//! Branch arms are laid out inline; their columns carry a header
//! annotation naming the bit value they run under (`b0=1`, `b0=0`).
//!
//! # Example
//!
//! ```
//! use qkern_core::{draw, CircuitBuilder};
//!
//! let mut builder = CircuitBuilder::new();
//! let q = builder.allocate(2).unwrap();
//! builder.h(q.qubit(0).unwrap()).unwrap();
//! builder.cx(q.qubit(0).unwrap(), q.qubit(1).unwrap()).unwrap();
//!
//! let diagram = draw(&builder.build());
//! assert!(diagram.contains("[h]"));
//! assert!(diagram.contains('●'));
//! assert!(diagram.contains('⊕'));
//! ```

use crate::operation::BitId;
use crate::{Angle, Circuit, GateKind, Operation, QubitId};
use std::fmt::Write as _;

/// Rendering style for the diagram
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderStyle {
    /// Unicode box-drawing characters
    #[default]
    Unicode,
    /// ASCII-only characters for maximum compatibility
    Ascii,
}

/// Configuration for diagram rendering
#[derive(Debug, Clone)]
pub struct DrawConfig {
    /// Rendering style
    pub style: RenderStyle,
    /// Show qubit labels (`q0: `, `q1: `, ...)
    pub show_labels: bool,
    /// Digits after the decimal point for literal angles
    pub float_precision: usize,
    /// Prefix the diagram with a depth annotation
    pub show_depth: bool,
    /// Values bound to parameter placeholders; unbound ones render as `θi`
    pub params: Vec<f64>,
}

impl Default for DrawConfig {
    fn default() -> Self {
        Self {
            style: RenderStyle::Unicode,
            show_labels: true,
            float_precision: 4,
            show_depth: false,
            params: Vec::new(),
        }
    }
}

impl DrawConfig {
    /// ASCII-only configuration
    pub fn ascii_only() -> Self {
        Self {
            style: RenderStyle::Ascii,
            ..Default::default()
        }
    }

    /// Set the rendering style
    pub fn with_style(mut self, style: RenderStyle) -> Self {
        self.style = style;
        self
    }

    /// Toggle qubit labels
    pub fn with_labels(mut self, show: bool) -> Self {
        self.show_labels = show;
        self
    }

    /// Set the angle precision
    pub fn with_precision(mut self, precision: usize) -> Self {
        self.float_precision = precision;
        self
    }

    /// Toggle the depth header
    pub fn with_depth(mut self, show: bool) -> Self {
        self.show_depth = show;
        self
    }

    /// Render placeholders with these bound values
    pub fn with_params(mut self, params: &[f64]) -> Self {
        self.params = params.to_vec();
        self
    }
}

struct Symbols {
    control: &'static str,
    target_x: &'static str,
    swap: &'static str,
    measure: &'static str,
    wire_h: char,
    wire_v: &'static str,
}

impl Symbols {
    const UNICODE: Symbols = Symbols {
        control: "●",
        target_x: "⊕",
        swap: "×",
        measure: "M",
        wire_h: '─',
        wire_v: "│",
    };

    const ASCII: Symbols = Symbols {
        control: "@",
        target_x: "(+)",
        swap: "x",
        measure: "M",
        wire_h: '-',
        wire_v: "|",
    };

    fn for_style(style: RenderStyle) -> &'static Symbols {
        match style {
            RenderStyle::Unicode => &Self::UNICODE,
            RenderStyle::Ascii => &Self::ASCII,
        }
    }
}

/// Render a circuit with the default configuration
pub fn draw(circuit: &Circuit) -> String {
    draw_with_config(circuit, &DrawConfig::default())
}

/// Render a circuit with its placeholders bound to `params`
///
/// ```
/// use qkern_core::{draw_with_params, CircuitBuilder};
///
/// let mut builder = CircuitBuilder::new();
/// let q = builder.qubit();
/// let theta = builder.parameter();
/// builder.ry(theta, q).unwrap();
///
/// assert!(draw_with_params(&builder.build(), &[0.25]).contains("[ry(0.2500)]"));
/// ```
pub fn draw_with_params(circuit: &Circuit, params: &[f64]) -> String {
    draw_with_config(circuit, &DrawConfig::default().with_params(params))
}

/// Render a circuit with a custom configuration
pub fn draw_with_config(circuit: &Circuit, config: &DrawConfig) -> String {
    Renderer::new(circuit, config).render()
}

impl Circuit {
    /// Text diagram of the circuit, see [`draw`]
    pub fn draw(&self) -> String {
        draw(self)
    }

    /// Text diagram with placeholders bound, see [`draw_with_params`]
    pub fn draw_with_params(&self, params: &[f64]) -> String {
        draw_with_params(self, params)
    }
}

/// One visual column: an optional branch annotation and one cell per qubit
struct Column {
    annotation: Option<String>,
    cells: Vec<Option<String>>,
}

struct Renderer<'a> {
    circuit: &'a Circuit,
    config: &'a DrawConfig,
    symbols: &'static Symbols,
}

impl<'a> Renderer<'a> {
    fn new(circuit: &'a Circuit, config: &'a DrawConfig) -> Self {
        Self {
            circuit,
            config,
            symbols: Symbols::for_style(config.style),
        }
    }

    fn render(&self) -> String {
        let mut columns = Vec::new();
        let mut conditions = Vec::new();
        self.layout(self.circuit.as_slice(), &mut conditions, &mut columns);

        let num_qubits = self.circuit.num_qubits();
        let label_width = if self.config.show_labels {
            3 + digit_count(num_qubits.saturating_sub(1))
        } else {
            0
        };
        let widths: Vec<usize> = columns
            .iter()
            .map(|col| {
                let cell = col
                    .cells
                    .iter()
                    .flatten()
                    .map(|c| display_width(c))
                    .max()
                    .unwrap_or(1);
                let header = col.annotation.as_deref().map_or(0, display_width);
                cell.max(header) + 2
            })
            .collect();

        let mut out = String::new();
        if self.config.show_depth {
            let _ = writeln!(out, "// Depth: {}", self.circuit.depth());
        }

        if columns.iter().any(|c| c.annotation.is_some()) {
            let mut header = " ".repeat(label_width);
            for (col, &width) in columns.iter().zip(&widths) {
                header.push_str(&center(col.annotation.as_deref().unwrap_or(""), width, ' '));
                header.push(' ');
            }
            out.push_str(header.trim_end());
            out.push('\n');
        }

        let wire = self.symbols.wire_h;
        for q in 0..num_qubits {
            if self.config.show_labels {
                let label = format!("q{}:", q);
                let _ = write!(out, "{:<width$}", label, width = label_width);
            }
            for (col, &width) in columns.iter().zip(&widths) {
                match &col.cells[q] {
                    Some(cell) => out.push_str(&center(cell, width, wire)),
                    None => out.extend(std::iter::repeat(wire).take(width)),
                }
                out.push(wire);
            }
            out.push(wire);
            if q + 1 < num_qubits {
                out.push('\n');
            }
        }
        out
    }

    fn layout(&self, ops: &[Operation], conditions: &mut Vec<String>, columns: &mut Vec<Column>) {
        for op in ops {
            match op {
                Operation::Branch {
                    bit,
                    then_ops,
                    else_ops,
                } => {
                    conditions.push(self.condition(*bit, true));
                    self.layout(then_ops, conditions, columns);
                    conditions.pop();
                    conditions.push(self.condition(*bit, false));
                    self.layout(else_ops, conditions, columns);
                    conditions.pop();
                }
                _ => {
                    let annotation = if conditions.is_empty() {
                        None
                    } else {
                        Some(conditions.join(","))
                    };
                    columns.push(Column {
                        annotation,
                        cells: self.cells(op),
                    });
                }
            }
        }
    }

    fn condition(&self, bit: BitId, value: bool) -> String {
        let name = match self.circuit.bit_label(bit) {
            Some(label) => label.to_string(),
            None => bit.to_string(),
        };
        format!("{}={}", name, u8::from(value))
    }

    fn cells(&self, op: &Operation) -> Vec<Option<String>> {
        let mut cells = vec![None; self.circuit.num_qubits()];
        match op {
            Operation::Gate {
                kind: GateKind::Swap,
                targets,
                ..
            } => {
                self.span(&mut cells, targets);
                for q in targets {
                    cells[q.index()] = Some(self.symbols.swap.to_string());
                }
            }
            Operation::Gate {
                kind,
                targets,
                params,
            } => {
                for q in targets {
                    cells[q.index()] = Some(self.boxed(*kind, params));
                }
            }
            Operation::Controlled {
                kind,
                controls,
                target,
                params,
            } => {
                let mut all: Vec<QubitId> = controls.to_vec();
                all.push(*target);
                self.span(&mut cells, &all);
                for q in controls {
                    cells[q.index()] = Some(self.symbols.control.to_string());
                }
                cells[target.index()] = Some(match kind {
                    GateKind::X => self.symbols.target_x.to_string(),
                    _ => self.boxed(*kind, params),
                });
            }
            Operation::Measure { qubit, .. } => {
                cells[qubit.index()] = Some(self.symbols.measure.to_string());
            }
            Operation::Branch { .. } => {}
        }
        cells
    }

    // vertical connector through the qubits strictly between the outermost ones
    fn span(&self, cells: &mut [Option<String>], qubits: &[QubitId]) {
        let (Some(lo), Some(hi)) = (qubits.iter().min(), qubits.iter().max()) else {
            return;
        };
        for cell in &mut cells[lo.index() + 1..hi.index()] {
            *cell = Some(self.symbols.wire_v.to_string());
        }
    }

    fn boxed(&self, kind: GateKind, params: &[Angle]) -> String {
        if params.is_empty() {
            return format!("[{}]", kind.name());
        }
        let args: Vec<String> = params
            .iter()
            .map(|p| match p.resolve(&self.config.params) {
                Some(v) => format!("{:.*}", self.config.float_precision, v),
                None => p.param().map(|id| id.to_string()).unwrap_or_default(),
            })
            .collect();
        format!("[{}({})]", kind.name(), args.join(","))
    }
}

fn digit_count(n: usize) -> usize {
    if n == 0 {
        1
    } else {
        (n as f64).log10().floor() as usize + 1
    }
}

// box-drawing and math symbols used here are all single-width
fn display_width(s: &str) -> usize {
    s.chars().count()
}

fn center(s: &str, width: usize, fill: char) -> String {
    let s_width = display_width(s);
    if s_width >= width {
        return s.to_string();
    }
    let total_pad = width - s_width;
    let left_pad = total_pad / 2;
    let right_pad = total_pad - left_pad;

    let mut result = String::with_capacity(width + s.len());
    result.extend(std::iter::repeat(fill).take(left_pad));
    result.push_str(s);
    result.extend(std::iter::repeat(fill).take(right_pad));
    result
}
