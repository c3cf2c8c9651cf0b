// Company Resolver - Core Library
// Groups company records describing the same organization into clusters:
// normalize → block → score pairs → union-find → assign

pub mod normalize;      // Normalizer: canonical comparable text
pub mod record;         // Raw and normalized company records
pub mod blocking;       // Block keys and grouping
pub mod scoring;        // Token set pair scoring
pub mod matching;       // Pairwise matches inside blocks
pub mod clustering;     // Union-find + cluster assignment
pub mod config;         // Resolver configuration
pub mod error;          // Core error type
pub mod pipeline;       // End-to-end resolver
pub mod report;         // Block stats, samples, run summary
pub mod io;             // CSV / JSONL load, CSV export
pub mod logging;        // tracing subscriber setup for binaries

// Re-export commonly used types
pub use normalize::{normalize, normalize_str};
pub use record::{check_alignment, normalize_records, RawRecord, Record, RecordId};
pub use blocking::{block_key, Blocks, BLOCK_KEY_SEPARATOR};
pub use scoring::{token_set_ratio, PairScorer, TokenSetScorer};
pub use matching::{MatchFinder, MatchPair};
pub use clustering::{assign, Assignment, ClusterId, DisjointSet};
pub use config::{ResolverConfig, DEFAULT_BLOCK_PREFIX_LENGTH, DEFAULT_MATCH_THRESHOLD};
pub use error::{ResolveError, ResolveResult};
pub use pipeline::{EntityResolver, Resolution, ResolutionStats};
pub use report::{
    block_members, block_sizes, largest_blocks, sample_block, sample_clusters, sample_matches,
    BlockStat, ResolutionSummary, SampleCluster, SampleMatch,
};
pub use io::{export_rows, load, load_csv, load_jsonl, write_csv, write_summary_json, DatasetFormat, ExportRow};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
