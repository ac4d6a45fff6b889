use std::fmt::Write;

use pagetree_core::ContentDivergentGroup;
use pagetree_core::ContentKind;
use pagetree_core::ContentNode;
use pagetree_core::ContentTable;
use pagetree_core::LinkTarget;
use pagetree_core::PageNode;
use pagetree_core::SourceSetRegistry;
use pagetree_core::SourceSets;
use pagetree_core::Style;

/// The page hierarchy with two spaces of indentation per level.
pub fn render_outline(root: &PageNode) -> String {
	let mut output = String::new();
	root.walk(&mut |page, depth| {
		let _ = writeln!(
			output,
			"{}{} ({})",
			"  ".repeat(depth),
			page.name,
			page.kind.label()
		);
	});
	output
}

/// Every page as a GitHub flavored markdown section. Headings are nested by
/// page depth so that child pages become subsections of their parent.
///
/// Links to declarations are written as plain text since turning a DRI into
/// a path needs a location provider.
pub fn render_markdown(root: &PageNode, source_sets: &SourceSetRegistry) -> String {
	let mut output = String::new();
	root.walk(&mut |page, depth| {
		let mut writer = MarkdownWriter::new(source_sets, depth);
		writer.node(&page.content);
		output.push_str(&writer.output);
		output.push_str("\n\n");
	});
	normalize_blank_lines(&output)
}

/// Divergent instances that share their `before` and `after` parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollapsedInstances<'a> {
	pub before: Option<&'a ContentNode>,
	pub variants: Vec<DivergentVariant<'a>>,
	pub after: Option<&'a ContentNode>,
}

/// One distinct `divergent` part with every source set it applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DivergentVariant<'a> {
	pub source_sets: SourceSets,
	pub content: &'a ContentNode,
}

/// Group the instances of `group` so that content which only differs in its
/// source sets is rendered once.
///
/// Instances are first grouped by their `before` and `after` parts, then
/// identical `divergent` parts inside a group are merged and their source
/// sets unioned. Groups and variants keep the order of first appearance.
pub fn collapse_divergent_instances(group: &ContentDivergentGroup) -> Vec<CollapsedInstances<'_>> {
	let mut keys: Vec<(Option<ContentNode>, Option<ContentNode>)> = Vec::new();
	let mut collapsed: Vec<CollapsedInstances<'_>> = Vec::new();

	for instance in group.instances() {
		let key = (
			stripped(instance.before.as_deref()),
			stripped(instance.after.as_deref()),
		);
		let index = if let Some(index) = keys.iter().position(|existing| *existing == key) {
			index
		} else {
			keys.push(key);
			collapsed.push(CollapsedInstances {
				before: instance.before.as_deref(),
				variants: Vec::new(),
				after: instance.after.as_deref(),
			});
			collapsed.len() - 1
		};

		let Some(divergent) = instance.divergent.as_deref() else {
			continue;
		};
		let divergent_key = divergent.without_source_sets();
		let variants = &mut collapsed[index].variants;
		match variants
			.iter_mut()
			.find(|variant| variant.content.without_source_sets() == divergent_key)
		{
			Some(variant) => {
				variant
					.source_sets
					.extend(instance.meta.source_sets.iter().cloned());
			}
			None => {
				variants.push(DivergentVariant {
					source_sets: instance.meta.source_sets.clone(),
					content: divergent,
				});
			}
		}
	}

	collapsed
}

fn stripped(node: Option<&ContentNode>) -> Option<ContentNode> {
	node.map(ContentNode::without_source_sets)
}

struct MarkdownWriter<'a> {
	source_sets: &'a SourceSetRegistry,
	/// Added to every heading level.
	depth: usize,
	output: String,
}

impl<'a> MarkdownWriter<'a> {
	fn new(source_sets: &'a SourceSetRegistry, depth: usize) -> Self {
		Self {
			source_sets,
			depth,
			output: String::new(),
		}
	}

	/// `nodes` rendered on a single line.
	fn inline<'n>(&self, nodes: impl IntoIterator<Item = &'n ContentNode>) -> String {
		let mut writer = Self::new(self.source_sets, self.depth);
		writer.children(nodes);
		writer
			.output
			.lines()
			.map(str::trim)
			.filter(|line| !line.is_empty())
			.collect::<Vec<_>>()
			.join("<br>")
	}

	fn paragraph_break(&mut self) {
		if !self.output.is_empty() && !self.output.ends_with("\n\n") {
			self.output.push_str("\n\n");
		}
	}

	fn children<'n>(&mut self, children: impl IntoIterator<Item = &'n ContentNode>) {
		let mut previous_signature: Option<ContentNode> = None;
		for child in children {
			if !is_signature(child) {
				previous_signature = None;
				self.node(child);
				continue;
			}

			// Per source set signatures that read the same are shown once.
			let signature = child.without_source_sets();
			if previous_signature.as_ref() == Some(&signature) {
				continue;
			}
			if previous_signature.is_some() {
				self.paragraph_break();
			}
			previous_signature = Some(signature);
			self.node(child);
		}
	}

	fn node(&mut self, node: &ContentNode) {
		match node {
			ContentNode::Text(text) => self.text(&text.text, node),
			ContentNode::Break(_) => self.output.push('\n'),
			ContentNode::Group(group) => {
				if node.has_style(Style::Monospace) {
					let code = node.text_content();
					if !code.is_empty() {
						let _ = write!(self.output, "`{code}`");
					}
				} else if is_block(node) {
					self.paragraph_break();
					self.children(&group.children);
					self.paragraph_break();
				} else {
					self.children(&group.children);
				}
			}
			ContentNode::Header(header) => {
				let level = (header.level + self.depth).clamp(1, 6);
				let title = self.inline(&header.children);
				self.paragraph_break();
				let _ = write!(self.output, "{} {title}", "#".repeat(level));
				self.paragraph_break();
			}
			ContentNode::Code(code) => {
				let body = node.text_content();
				if code.block {
					self.paragraph_break();
					let _ = write!(self.output, "```{}\n{body}\n```", code.language);
					self.paragraph_break();
				} else {
					let _ = write!(self.output, "`{body}`");
				}
			}
			ContentNode::Link(link) => {
				let text = self.inline(&link.children);
				match &link.target {
					LinkTarget::Url(url) => {
						let _ = write!(self.output, "[{text}]({url})");
					}
					LinkTarget::Dri(_) => self.output.push_str(&text),
				}
			}
			ContentNode::Table(table) => self.table(table),
			ContentNode::List(list) => {
				self.paragraph_break();
				for (index, item) in list.children.iter().enumerate() {
					let marker = if list.ordered {
						format!("{}.", index + 1)
					} else {
						"-".to_string()
					};
					let item = self.inline([item]);
					let _ = writeln!(self.output, "{marker} {item}");
				}
				self.paragraph_break();
			}
			ContentNode::DivergentGroup(group) => self.divergent_group(group),
			ContentNode::DivergentInstance(_) => self.children(node.children()),
			ContentNode::PlatformHinted(hinted) => {
				if self.source_sets.len() > 1 {
					self.hint(&hinted.meta.source_sets);
				}
				self.node(&hinted.inner);
			}
		}
	}

	fn text(&mut self, text: &str, node: &ContentNode) {
		if text.is_empty() {
			return;
		}

		let mut rendered = if node.has_style(Style::Monospace) {
			format!("`{text}`")
		} else {
			text.to_string()
		};
		for (style, marker) in [
			(Style::Strikethrough, "~~"),
			(Style::Italic, "*"),
			(Style::Bold, "**"),
		] {
			if node.has_style(style) {
				rendered = format!("{marker}{rendered}{marker}");
			}
		}
		self.output.push_str(&rendered);
	}

	fn table(&mut self, table: &ContentTable) {
		let header: Vec<String> = table
			.header
			.iter()
			.map(|cell| escape_cell(&self.inline([cell])))
			.collect();
		let rows: Vec<Vec<String>> = table
			.children
			.iter()
			.map(|row| {
				row_cells(row)
					.into_iter()
					.map(|cell| escape_cell(&self.inline([cell])))
					.collect()
			})
			.collect();
		let columns = rows
			.iter()
			.map(Vec::len)
			.chain([header.len()])
			.max()
			.unwrap_or_default();
		if columns == 0 {
			return;
		}

		self.paragraph_break();
		if let Some(caption) = &table.caption {
			let caption = self.inline([caption.as_ref()]);
			self.output.push_str(&caption);
			self.paragraph_break();
		}

		let mut lines = vec![
			table_line(&header, columns),
			table_line(&vec!["---".to_string(); columns], columns),
		];
		lines.extend(rows.iter().map(|row| table_line(row, columns)));
		self.output.push_str(&lines.join("\n"));
		self.paragraph_break();
	}

	fn divergent_group(&mut self, group: &ContentDivergentGroup) {
		let has_platforms = self.source_sets.len() > 1;
		for collapsed in collapse_divergent_instances(group) {
			let hinted =
				has_platforms && (group.implicitly_source_set_hinted || collapsed.variants.len() > 1);
			if let Some(before) = collapsed.before {
				self.node(before);
			}
			for variant in &collapsed.variants {
				self.paragraph_break();
				if hinted {
					self.hint(&variant.source_sets);
				}
				self.node(variant.content);
			}
			if let Some(after) = collapsed.after {
				self.paragraph_break();
				self.node(after);
			}
			self.paragraph_break();
		}
	}

	fn hint(&mut self, source_sets: &SourceSets) {
		let names = source_sets
			.iter()
			.map(|id| self.source_sets.display_name(id))
			.collect::<Vec<_>>()
			.join(", ");
		let _ = write!(self.output, "[{names}] ");
	}
}

fn is_signature(node: &ContentNode) -> bool {
	matches!(node, ContentNode::Group(_)) && node.has_style(Style::Monospace)
}

fn is_block(node: &ContentNode) -> bool {
	[
		Style::Block,
		Style::Paragraph,
		Style::Cover,
		Style::TabbedContent,
	]
	.into_iter()
	.any(|style| node.has_style(style))
		|| node.content_kind() == ContentKind::BriefComment
}

fn row_cells(row: &ContentNode) -> Vec<&ContentNode> {
	match row {
		ContentNode::Group(group) => group.children.iter().collect(),
		other => vec![other],
	}
}

fn escape_cell(cell: &str) -> String {
	cell.replace('|', "\\|")
}

fn table_line(cells: &[String], columns: usize) -> String {
	let cells = (0..columns)
		.map(|index| cells.get(index).map_or("", String::as_str))
		.collect::<Vec<_>>()
		.join(" | ");
	format!("| {cells} |")
}

/// Trailing whitespace removed and runs of blank lines collapsed into one.
fn normalize_blank_lines(markdown: &str) -> String {
	let mut lines: Vec<&str> = Vec::new();
	for line in markdown.lines().map(str::trim_end) {
		let after_blank = lines.last().is_none_or(|last| last.is_empty());
		if line.is_empty() && after_blank {
			continue;
		}
		lines.push(line);
	}
	while lines.last().is_some_and(|line| line.is_empty()) {
		lines.pop();
	}

	if lines.is_empty() {
		return String::new();
	}
	let mut output = lines.join("\n");
	output.push('\n');
	output
}
