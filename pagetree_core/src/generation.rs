use std::path::Path;
use std::sync::Arc;

use crate::CommentsToContentConverter;
use crate::CustomTagContentProvider;
use crate::DModule;
use crate::DefaultPageCreator;
use crate::DocTagToContentConverter;
use crate::GenerationReport;
use crate::KotlinSignatureProvider;
use crate::PageConfig;
use crate::PageContentBuilder;
use crate::PageError;
use crate::PageLogger;
use crate::PageNode;
use crate::PageResult;
use crate::PageTransformer;
use crate::PageTransformerPipeline;
use crate::SignatureProvider;
use crate::SinceKotlinTagContentProvider;
use crate::SourceSetRegistry;

/// The finished page tree of one run together with its problem counts.
#[derive(Debug, Clone)]
pub struct GenerationOutput {
	pub root: PageNode,
	pub report: GenerationReport,
}

/// Configured entry point for turning a module into pages.
///
/// Every call to [`Generator::generate`] starts with a fresh logger and a
/// fresh fragment cache, so one generator can serve many runs.
pub struct Generator {
	config: PageConfig,
	comments_converter: Arc<dyn CommentsToContentConverter>,
	signature_provider: Arc<dyn SignatureProvider>,
	custom_tag_providers: Vec<Arc<dyn CustomTagContentProvider>>,
	transformers: Vec<Arc<dyn PageTransformer>>,
}

impl Generator {
	pub fn new(config: PageConfig) -> Self {
		Self {
			config,
			comments_converter: Arc::new(DocTagToContentConverter),
			signature_provider: Arc::new(KotlinSignatureProvider),
			custom_tag_providers: vec![Arc::new(SinceKotlinTagContentProvider)],
			transformers: Vec::new(),
		}
	}

	pub fn config(&self) -> PageConfig {
		self.config
	}

	#[must_use]
	pub fn with_comments_converter(mut self, converter: Arc<dyn CommentsToContentConverter>) -> Self {
		self.comments_converter = converter;
		self
	}

	#[must_use]
	pub fn with_signature_provider(mut self, provider: Arc<dyn SignatureProvider>) -> Self {
		self.signature_provider = provider;
		self
	}

	#[must_use]
	pub fn with_custom_tag_provider(mut self, provider: Arc<dyn CustomTagContentProvider>) -> Self {
		self.custom_tag_providers.push(provider);
		self
	}

	/// Run `transformer` after the standard transformers.
	#[must_use]
	pub fn with_transformer(mut self, transformer: Arc<dyn PageTransformer>) -> Self {
		self.transformers.push(transformer);
		self
	}

	pub fn generate(&self, module: &DModule) -> PageResult<GenerationOutput> {
		let span = tracing::info_span!("generate", module = %module.name);
		let _entered = span.enter();

		let logger = Arc::new(PageLogger::new());
		let content_builder = PageContentBuilder::new(
			Arc::clone(&self.comments_converter),
			Arc::clone(&self.signature_provider),
			Arc::clone(&logger),
		);
		let creator = DefaultPageCreator::new(
			self.config,
			SourceSetRegistry::new(&module.source_sets),
			content_builder,
			self.custom_tag_providers.clone(),
		);

		let root = creator.page_for_module(module)?;
		let cache = creator.content_builder().fragment_cache();
		tracing::debug!(
			entries = cache.len(),
			hits = cache.hits(),
			misses = cache.misses(),
			"signature cache released"
		);
		drop(creator);

		let pipeline = self
			.transformers
			.iter()
			.fold(PageTransformerPipeline::standard(Arc::clone(&logger)), |pipeline, transformer| {
				pipeline.with(Arc::clone(transformer))
			});
		let root = pipeline.run(root);
		let report = logger.report();
		tracing::debug!(
			pages = root.page_count(),
			errors = report.errors,
			warnings = report.warnings,
			"generation finished"
		);

		Ok(GenerationOutput { root, report })
	}
}

/// Generate pages with the default collaborators.
pub fn generate(module: &DModule, config: PageConfig) -> PageResult<GenerationOutput> {
	Generator::new(config).generate(module)
}

/// Read a JSON encoded module from disk.
pub fn load_module(path: &Path) -> PageResult<DModule> {
	let content = std::fs::read_to_string(path)?;
	parse_module(&content, &path.display().to_string())
}

/// Parse a JSON encoded module. `origin` names the input in errors.
pub fn parse_module(content: &str, origin: &str) -> PageResult<DModule> {
	serde_json::from_str(content).map_err(|error| {
		PageError::InputParse {
			path: origin.to_string(),
			reason: error.to_string(),
		}
	})
}
