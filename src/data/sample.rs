//! Synthetic benchmark tables.
//!
//! Produces the six CSVs the figures read, with the same headers and parameter
//! sweeps as the benchmark harness, so the whole pipeline can be exercised
//! without running it.
//!
//! Size model (bytes, before noise):
//! - record: `RECORD_BASE + RECORD_PER_ATTR * (numerical + categorical)`
//! - aggregation: `AGG_BASE + AGG_PER_NUMERICAL * numerical + AGG_PER_CATEGORICAL * categorical`
//! - full tree: every record plus one aggregation per tree node (`2n - 1` nodes)
//! - pruned tree (Merkle path): one record plus an aggregation per level
//! - query proof: a path per matching record, shared near the root when the
//!   records are sorted (larger sorting window `w`)

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::domain::SampleConfig;
use crate::error::AppError;

const RECORD_BASE: f64 = 48.0;
const RECORD_PER_ATTR: f64 = 9.0;
const AGG_BASE: f64 = 64.0;
const AGG_PER_NUMERICAL: f64 = 8.0;
const AGG_PER_CATEGORICAL: f64 = 4.0;
const HASH_BYTES: f64 = 32.0;

/// Selectivities swept by the query proof benchmark.
const QUERY_P_VALUES: [f64; 4] = [0.8, 0.5, 0.2, 0.1];
/// Sorting windows as fractions of the record count.
const QUERY_WINDOW_FRACTIONS: [f64; 5] = [0.0, 0.1, 0.25, 0.75, 1.0];
/// Query filters over three categorical attributes.
const QUERY_FILTERS: [[bool; 3]; 4] = [
    [true, false, false],
    [true, true, false],
    [false, true, true],
    [true, true, true],
];

/// One generated CSV file.
#[derive(Debug, Clone)]
pub struct Table {
    pub file_name: &'static str,
    pub headers: Vec<&'static str>,
    pub rows: Vec<Vec<String>>,
}

/// All six benchmark files, in figure order.
pub type BenchmarkTables = Vec<Table>;

pub fn generate_benchmarks(config: &SampleConfig) -> Result<BenchmarkTables, AppError> {
    if config.max_records == 0 || config.max_attributes == 0 || config.query_records == 0 {
        return Err(AppError::new(2, "Sample sizes must be > 0."));
    }
    if !(config.noise_rel.is_finite() && config.noise_rel >= 0.0 && config.noise_rel < 0.5) {
        return Err(AppError::new(2, "Invalid noise level (expected 0 <= noise < 0.5)."));
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let normal = Normal::new(0.0, 1.0)
        .map_err(|e| AppError::new(4, format!("Noise distribution error: {e}")))?;
    let mut noisy = |v: f64| -> String {
        let z: f64 = normal.sample(&mut rng);
        let bytes = (v * (1.0 + config.noise_rel * z)).round().max(1.0);
        format!("{bytes}")
    };

    let attrs = powers_of_two(config.max_attributes);
    let records = powers_of_two(config.max_records);

    let mut record_agg = Vec::new();
    let mut record_and_agg = Vec::new();
    for &num in &attrs {
        for &cat in &attrs {
            record_agg.push(vec![num.to_string(), cat.to_string(), noisy(aggregation_size(num, cat))]);
            record_and_agg.push(vec![
                num.to_string(),
                cat.to_string(),
                noisy(record_size(num, cat)),
                noisy(aggregation_size(num, cat)),
            ]);
        }
    }

    let mut full = Vec::new();
    let mut pruned = Vec::new();
    for &n in &records {
        for &a in &attrs {
            full.push(vec![n.to_string(), a.to_string(), noisy(full_tree_size(n, a))]);
            pruned.push(vec![n.to_string(), a.to_string(), noisy(pruned_tree_size(n, a))]);
        }
    }

    let query_sorted = query_rows(config, &QUERY_WINDOW_FRACTIONS, &mut rng);
    let query_unsorted = query_rows(config, &[0.0], &mut rng);

    log::debug!(
        "generated {} record, {} tree and {} query rows",
        record_agg.len(),
        full.len(),
        query_sorted.len() + query_unsorted.len()
    );

    Ok(vec![
        Table {
            file_name: "record_aggregation_size.csv",
            headers: vec!["NumberNumerical", "NumberCategorical", "Size"],
            rows: record_agg,
        },
        Table {
            file_name: "record_and_record_aggregation_size.csv",
            headers: vec!["NumberNumerical", "NumberCategorical", "RecordSize", "RecordAggregationSize"],
            rows: record_and_agg,
        },
        Table {
            file_name: "full_history_tree_size.csv",
            headers: vec!["NumberRecords", "NumberAttributes", "Size"],
            rows: full,
        },
        Table {
            file_name: "pruned_history_tree_size.csv",
            headers: vec!["NumberRecords", "NumberAttributes", "Size"],
            rows: pruned,
        },
        Table {
            file_name: "query_proof_size.csv",
            headers: QUERY_HEADERS.to_vec(),
            rows: query_sorted,
        },
        Table {
            file_name: "query_proof_unsorted_size.csv",
            headers: QUERY_HEADERS.to_vec(),
            rows: query_unsorted,
        },
    ])
}

const QUERY_HEADERS: [&str; 11] = [
    "Query",
    "p",
    "w",
    "NumberOfRecordsMatching",
    "ProofSize",
    "SizeOfRecordsMatching",
    "NumberOfRecordsAll",
    "SizeOfRecordsAll",
    "SizeOfProofAll",
    "NumberNumericalAttributes",
    "NumberCategoricalAttributes",
];

fn query_rows(config: &SampleConfig, window_fractions: &[f64], rng: &mut StdRng) -> Vec<Vec<String>> {
    // The harness uses one numerical and three categorical attributes.
    let (num_attrs, cat_attrs) = (1usize, 3usize);
    let n = config.query_records;
    let per_record = record_size(num_attrs, cat_attrs);
    let size_all = per_record * n as f64;
    let proof_all = full_tree_size(n, cat_attrs);
    let depth = (n as f64).log2().ceil().max(1.0);

    let mut rows = Vec::new();
    for &p in &QUERY_P_VALUES {
        for &frac in window_fractions {
            let w = (n as f64 * frac) as usize;
            for filter in &QUERY_FILTERS {
                let selectivity = filter.iter().filter(|&&set| set).fold(1.0, |acc, _| acc * p);
                let expected = selectivity * n as f64;
                let jitter = 1.0 + config.noise_rel * (rng.r#gen::<f64>() - 0.5);
                let matching = (expected * jitter).round().clamp(0.0, n as f64) as usize;

                // Sorting clusters matches, so paths share more of the tree.
                let shared = 1.0 - 0.8 * frac;
                let path_bytes = depth * (HASH_BYTES + aggregation_size(num_attrs, cat_attrs)) * shared;
                let proof = matching as f64 * (per_record + path_bytes) + HASH_BYTES;

                rows.push(vec![
                    filter_label(filter),
                    p.to_string(),
                    w.to_string(),
                    matching.to_string(),
                    format!("{}", proof.round()),
                    format!("{}", (matching as f64 * per_record).round()),
                    n.to_string(),
                    format!("{}", size_all.round()),
                    format!("{}", proof_all.round()),
                    num_attrs.to_string(),
                    cat_attrs.to_string(),
                ]);
            }
        }
    }
    rows
}

fn filter_label(filter: &[bool; 3]) -> String {
    let parts: Vec<&str> = filter.iter().map(|&b| if b { "true" } else { "false" }).collect();
    format!("[{}]", parts.join(", "))
}

fn powers_of_two(max: usize) -> Vec<usize> {
    std::iter::successors(Some(1usize), |&v| v.checked_mul(2))
        .take_while(|&v| v <= max)
        .collect()
}

pub fn record_size(numerical: usize, categorical: usize) -> f64 {
    RECORD_BASE + RECORD_PER_ATTR * (numerical + categorical) as f64
}

pub fn aggregation_size(numerical: usize, categorical: usize) -> f64 {
    AGG_BASE + AGG_PER_NUMERICAL * numerical as f64 + AGG_PER_CATEGORICAL * categorical as f64
}

pub fn full_tree_size(records: usize, attributes: usize) -> f64 {
    let nodes = (2 * records).saturating_sub(1) as f64;
    records as f64 * record_size(attributes, attributes) + nodes * aggregation_size(attributes, attributes)
}

pub fn pruned_tree_size(records: usize, attributes: usize) -> f64 {
    let levels = (records as f64).log2().ceil() + 1.0;
    record_size(attributes, attributes) + levels * aggregation_size(attributes, attributes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> SampleConfig {
        SampleConfig {
            max_records: 64,
            max_attributes: 8,
            query_records: 1_000,
            ..SampleConfig::default()
        }
    }

    #[test]
    fn tables_have_harness_headers_and_sweeps() {
        let tables = generate_benchmarks(&small()).unwrap();
        assert_eq!(tables.len(), 6);

        let full = tables.iter().find(|t| t.file_name == "full_history_tree_size.csv").unwrap();
        assert_eq!(full.headers, vec!["NumberRecords", "NumberAttributes", "Size"]);
        // records 1..=64 (7 values) x attributes 1..=8 (4 values)
        assert_eq!(full.rows.len(), 7 * 4);

        let sorted = tables.iter().find(|t| t.file_name == "query_proof_size.csv").unwrap();
        assert_eq!(sorted.rows.len(), 4 * 5 * 4);
        let unsorted = tables.iter().find(|t| t.file_name == "query_proof_unsorted_size.csv").unwrap();
        assert_eq!(unsorted.rows.len(), 4 * 4);
        assert!(unsorted.rows.iter().all(|r| r[2] == "0"));
    }

    #[test]
    fn same_seed_same_tables() {
        let a = generate_benchmarks(&small()).unwrap();
        let b = generate_benchmarks(&small()).unwrap();
        for (ta, tb) in a.iter().zip(&b) {
            assert_eq!(ta.rows, tb.rows);
        }
    }

    #[test]
    fn pruned_tree_grows_logarithmically() {
        let a = pruned_tree_size(1024, 2);
        let b = pruned_tree_size(2048, 2);
        assert!((b - a - aggregation_size(2, 2)).abs() < 1e-9);
        assert!(full_tree_size(2048, 2) > 1.9 * full_tree_size(1024, 2));
    }

    #[test]
    fn powers_of_two_inclusive() {
        assert_eq!(powers_of_two(8), vec![1, 2, 4, 8]);
        assert_eq!(powers_of_two(10), vec![1, 2, 4, 8]);
        assert_eq!(powers_of_two(1), vec![1]);
    }

    #[test]
    fn tables_reload_through_ingest_and_fit() {
        let tables = generate_benchmarks(&small()).unwrap();
        let pruned = tables.iter().find(|t| t.file_name == "pruned_history_tree_size.csv").unwrap();

        let mut buf = Vec::new();
        crate::io::write_table(&mut buf, pruned).unwrap();
        let ds = crate::io::load_dataset_from_reader(pruned.file_name, buf.as_slice()).unwrap();
        assert_eq!(ds.len(), pruned.rows.len());

        let series = crate::data::filter_series(
            &ds,
            &[crate::domain::Predicate::equals("NumberAttributes", 2.0)],
            "NumberRecords",
            "Size",
        )
        .unwrap();
        let fit = crate::fit::fit_semi_log_x(&series).unwrap();
        // One aggregation (64 + 8*2 + 4*2 = 88 bytes) per doubling, in ln units.
        let per_ln = 88.0 / std::f64::consts::LN_2;
        assert!((fit.slope() - per_ln).abs() / per_ln < 0.1, "slope {}", fit.slope());
    }

    #[test]
    fn rejects_bad_noise() {
        let cfg = SampleConfig { noise_rel: -0.1, ..small() };
        assert_eq!(generate_benchmarks(&cfg).unwrap_err().exit_code(), 2);
    }
}
