use serde::Serialize;

use crate::error::{BigramError, Result};
use crate::model::frequency_table::FrequencyTable;
use crate::model::vocabulary::Vocabulary;

/// Glyphs from lowest to highest count.
const SHADES: [char; 5] = [' ', '░', '▒', '▓', '█'];

/// One labelled cell of the frequency heatmap.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct ReportCell {
	/// Previous and next symbol labels, e.g. `^a`, `ab`, `b^`.
	pub pair: String,
	pub count: u64,
}

/// Heatmap-style view of a `FrequencyTable` with symbol-pair labels.
///
/// Diagnostic only: the model never reads it back.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct FrequencyReport {
	symbols: Vec<char>,
	rows: Vec<Vec<ReportCell>>,
	max_count: u64,
}

impl FrequencyReport {
	/// Labels every cell of `frequencies` with the symbols of `vocabulary`.
	///
	/// # Errors
	/// Returns `ShapeMismatch` if the table was not built for `vocabulary`.
	pub fn new(vocabulary: &Vocabulary, frequencies: &FrequencyTable) -> Result<Self> {
		if vocabulary.size() != frequencies.size() {
			return Err(BigramError::ShapeMismatch { stage: "report", expected: vocabulary.size(), found: frequencies.size() });
		}

		let symbols: Vec<char> = (0..vocabulary.size())
			.filter_map(|index| vocabulary.label(index))
			.collect();

		let rows: Vec<Vec<ReportCell>> = symbols
			.iter()
			.enumerate()
			.map(|(prev, prev_label)| {
				frequencies
					.row(prev)
					.iter()
					.zip(&symbols)
					.map(|(count, next_label)| ReportCell {
						pair: format!("{prev_label}{next_label}"),
						count: *count,
					})
					.collect()
			})
			.collect();

		let max_count = (0..frequencies.size())
			.flat_map(|prev| frequencies.row(prev).iter().copied())
			.max()
			.unwrap_or(0);

		Ok(Self { symbols, rows, max_count })
	}

	pub fn symbols(&self) -> &[char] {
		&self.symbols
	}

	pub fn rows(&self) -> &[Vec<ReportCell>] {
		&self.rows
	}

	fn shade(&self, count: u64) -> char {
		if count == 0 || self.max_count == 0 {
			return SHADES[0];
		}
		let top = (SHADES.len() - 1) as u64;
		// Any nonzero count gets at least the lightest glyph.
		let level = (count * top).div_ceil(self.max_count);
		SHADES[level.clamp(1, top) as usize]
	}

	/// Renders the table as a text grid, one line per previous symbol.
	///
	/// Each cell reads `<shade><pair>:<count>`.
	pub fn render_text(&self) -> String {
		let cells: Vec<Vec<String>> = self
			.rows
			.iter()
			.map(|row| {
				row.iter()
					.map(|cell| format!("{}{}:{}", self.shade(cell.count), cell.pair, cell.count))
					.collect()
			})
			.collect();

		let width = cells
			.iter()
			.flatten()
			.map(|cell| cell.chars().count())
			.max()
			.unwrap_or(0);

		let mut out = String::new();
		for row in cells {
			let line: Vec<String> = row.iter().map(|cell| format!("{cell:<width$}")).collect();
			out.push_str(line.join(" ").trim_end());
			out.push('\n');
		}
		out
	}

	/// Pretty-printed JSON dump.
	pub fn to_json(&self) -> Result<String> {
		Ok(serde_json::to_string_pretty(self)?)
	}
}
