//! `quickstart.blocks.seeded_defaults`: default content blocks exist

use async_trait::async_trait;
use quickstart_core::memory::DEFAULT_CONTENT_ENVIRONMENT;
use quickstart_core::types::BlockDefinition;
use quickstart_core::utils::normalize_lookup_key;
use quickstart_core::{Admin, CheckOutput, DoctorCheck, Finding};
use std::collections::BTreeSet;

pub const CHECK_SEEDED_BLOCKS: &str = "quickstart.blocks.seeded_defaults";

pub const CODE_CONTENT_SERVICE_MISSING: &str = "quickstart.blocks.content_service";
pub const CODE_BLOCKS_LOAD_FAILED: &str = "quickstart.blocks.load";
pub const CODE_BLOCKS_MISSING: &str = "quickstart.blocks.missing";
pub const CODE_BLOCKS_OK: &str = "quickstart.blocks.ok";

/// Block keys every seeded environment is expected to carry
pub const REQUIRED_BLOCKS: [&str; 2] = ["hero", "rich_text"];

const COMPONENT: &str = "blocks";

/// Every name a block answers to: id, slug and type, each with `-` and `_`
/// swapped
pub fn block_aliases(block: &BlockDefinition) -> BTreeSet<String> {
    let mut aliases = BTreeSet::new();
    for name in [&block.id, &block.slug, &block.block_type] {
        let key = normalize_lookup_key(name);
        if key.is_empty() {
            continue;
        }
        aliases.insert(key.replace('-', "_"));
        aliases.insert(key.replace('_', "-"));
        aliases.insert(key);
    }
    aliases
}

/// Required keys no block answers to
pub fn missing_blocks(blocks: &[BlockDefinition], required: &[&str]) -> Vec<String> {
    let known: BTreeSet<String> = blocks.iter().flat_map(block_aliases).collect();
    required
        .iter()
        .filter(|key| !known.contains(&normalize_lookup_key(key)))
        .map(|key| key.to_string())
        .collect()
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SeededBlocksCheck;

#[async_trait]
impl DoctorCheck for SeededBlocksCheck {
    fn id(&self) -> &str {
        CHECK_SEEDED_BLOCKS
    }

    fn label(&self) -> &str {
        "Seeded blocks"
    }

    fn description(&self) -> &str {
        "Checks that the default environment has the hero and rich_text blocks"
    }

    fn action(&self) -> &str {
        "Seed the default block definitions"
    }

    async fn run(&self, admin: &Admin) -> CheckOutput {
        let Some(content) = admin.content_service() else {
            return CheckOutput::new(vec![Finding::warn(
                CODE_CONTENT_SERVICE_MISSING,
                COMPONENT,
                "no content service is configured",
            )])
            .with_summary("content service missing");
        };

        let blocks = match content.block_definitions(DEFAULT_CONTENT_ENVIRONMENT).await {
            Ok(blocks) => blocks,
            Err(err) => {
                return CheckOutput::new(vec![Finding::error(
                    CODE_BLOCKS_LOAD_FAILED,
                    COMPONENT,
                    format!("failed to load block definitions: {err:#}"),
                )])
                .with_summary("block definitions unavailable");
            }
        };

        let missing = missing_blocks(&blocks, &REQUIRED_BLOCKS);
        let output = if missing.is_empty() {
            CheckOutput::new(vec![Finding::ok(
                CODE_BLOCKS_OK,
                COMPONENT,
                "default blocks are seeded",
            )])
            .with_summary("default blocks are seeded")
        } else {
            CheckOutput::new(vec![Finding::error(
                CODE_BLOCKS_MISSING,
                COMPONENT,
                format!(
                    "missing block definitions in {DEFAULT_CONTENT_ENVIRONMENT}: {}",
                    missing.join(", ")
                ),
            )
            .with_hint("seed the hero and rich_text block definitions")
            .with_metadata("missing", missing.clone())])
            .with_summary(format!("{} default block(s) missing", missing.len()))
        };
        output.with_metadata("environment", DEFAULT_CONTENT_ENVIRONMENT)
    }
}
