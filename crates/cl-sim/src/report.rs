//! Simulation reports and the progress log

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use cl_engine::{ParameterSet, SymbolId};
use serde::{Deserialize, Serialize};

use crate::simulator::{ProgressPoint, SimRun};
use crate::stats::SimStats;
use crate::SimResult;

/// Report file written by [`SimReport::write_to`]
pub const REPORT_FILE: &str = "chain_lightning_out.txt";
/// JSON twin of the text report
pub const REPORT_JSON_FILE: &str = "chain_lightning_out.json";
/// Progress CSV written during a run
pub const PROGRESS_FILE: &str = "chain_lightning_log.txt";

const PROGRESS_HEADER: &str = "Round,RTP%,HitRate%,WildModeFreq%,Sigma";

/// Final report of a batch run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimReport {
    pub generated_at: String,
    pub seed: u64,
    pub shards: usize,
    pub duration_ms: u64,
    pub bet: u64,
    pub rows: usize,
    pub cols: usize,
    pub min_wilds_for_mode: usize,
    pub wild_mode_multiplier: u32,
    /// Symbol names by id, for the symbol table
    pub symbol_names: Vec<String>,
    pub stats: SimStats,
}

impl SimReport {
    pub fn new(params: &ParameterSet, run: &SimRun) -> Self {
        Self {
            generated_at: chrono::Utc::now().to_rfc3339(),
            seed: run.seed,
            shards: run.shards,
            duration_ms: run.duration_ms,
            bet: params.bet,
            rows: params.grid.rows,
            cols: params.grid.cols,
            min_wilds_for_mode: params.wild_mode.min_wilds,
            wild_mode_multiplier: params.wild_mode.multiplier,
            symbol_names: (0..params.symbols.weights.len() as SymbolId)
                .map(|id| params.symbol_name(id))
                .collect(),
            stats: run.stats.clone(),
        }
    }

    fn symbol_name(&self, symbol: SymbolId) -> String {
        self.symbol_names
            .get(symbol as usize)
            .cloned()
            .unwrap_or_else(|| format!("Symbol{}", symbol))
    }

    /// Human-readable report
    pub fn to_text(&self) -> String {
        let s = &self.stats;
        let mut out = String::new();

        out.push_str("CHAIN LIGHTNING SIMULATION\n");
        out.push_str(&format!("Generated: {}\n", self.generated_at));
        out.push('\n');

        out.push_str("=== GENERAL ===\n");
        out.push_str(&format!("Grid:             {}x{}\n", self.rows, self.cols));
        out.push_str(&format!("Bet:              {}\n", self.bet));
        out.push_str(&format!("Spins:            {}\n", s.spins));
        out.push_str(&format!("Total wagered:    {}\n", s.total_wagered));
        out.push_str(&format!("Total won:        {}\n", s.total_won));
        out.push_str(&format!("RTP:              {:.4}%\n", s.rtp()));
        out.push_str(&format!("Hit rate:         {:.4}%\n", s.hit_rate()));
        out.push_str(&format!("Max win:          {} ({:.2}x)\n", s.max_win, ratio(s.max_win, self.bet)));
        out.push_str(&format!(
            "Sigma:            {:.2} ({:.4}x bet)\n",
            s.std_dev(),
            s.sigma(self.bet)
        ));
        out.push('\n');

        out.push_str("=== RTP BREAKDOWN ===\n");
        out.push_str(&format!("Base mode RTP:    {:.4}%\n", s.base_rtp()));
        out.push_str(&format!("Wild mode RTP:    {:.4}%\n", s.wild_rtp()));
        out.push('\n');

        out.push_str("=== WILD MODE ===\n");
        out.push_str(&format!("Trigger:          {}+ wilds (x{})\n", self.min_wilds_for_mode, self.wild_mode_multiplier));
        out.push_str(&format!(
            "Frequency:        {:.4}% (1/{:.0})\n",
            s.wild_mode_frequency(),
            s.wild_mode_interval().unwrap_or(0.0)
        ));
        out.push_str(&format!("Spins:            {}\n", s.wild_mode_spins));
        out.push_str(&format!("Average win:      {:.2}\n", s.wild_mode_avg_win()));
        out.push_str("Wilds per trigger:\n");
        for (wilds, count) in &s.wilds_distribution {
            out.push_str(&format!(
                "  {:>3}: {:>12} ({:.4}%)\n",
                wilds,
                count,
                percent(*count, s.wild_mode_spins)
            ));
        }
        out.push('\n');

        out.push_str("=== CHAIN LENGTHS ===\n");
        for (length, count) in &s.chain_lengths {
            out.push_str(&format!("  {:>3}: {:>12} ({:.4}%)\n", length, count, s.chain_length_share(*length)));
        }
        out.push('\n');

        out.push_str("=== SYMBOL WINS ===\n");
        for (symbol, tally) in &s.symbol_wins {
            out.push_str(&format!(
                "  {:<10} chains {:>12}  won {:>14}  RTP {:.4}%\n",
                self.symbol_name(*symbol),
                tally.chains,
                tally.total_win,
                percent(tally.total_win, s.total_wagered)
            ));
        }
        out.push('\n');

        out.push_str("=== PERFORMANCE ===\n");
        out.push_str(&format!("Seed:             {}\n", self.seed));
        out.push_str(&format!("Shards:           {}\n", self.shards));
        out.push_str(&format!("Duration:         {} ms\n", self.duration_ms));
        out.push_str(&format!("Spins/sec:        {:.0}\n", per_second(s.spins, self.duration_ms)));

        out
    }

    pub fn to_json(&self) -> SimResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the text and JSON reports into `dir`, creating it if needed
    pub fn write_to(&self, dir: impl AsRef<Path>) -> SimResult<Vec<PathBuf>> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;

        let text_path = dir.join(REPORT_FILE);
        fs::write(&text_path, self.to_text())?;

        let json_path = dir.join(REPORT_JSON_FILE);
        fs::write(&json_path, self.to_json()?)?;

        log::info!("Report written to {}", text_path.display());
        Ok(vec![text_path, json_path])
    }
}

fn ratio(amount: u64, bet: u64) -> f64 {
    if bet == 0 { 0.0 } else { amount as f64 / bet as f64 }
}

fn percent(part: u64, whole: u64) -> f64 {
    if whole == 0 { 0.0 } else { part as f64 / whole as f64 * 100.0 }
}

fn per_second(spins: u64, duration_ms: u64) -> f64 {
    if duration_ms == 0 { 0.0 } else { spins as f64 * 1000.0 / duration_ms as f64 }
}

// ═══════════════════════════════════════════════════════════════════════════════
// PROGRESS LOG
// ═══════════════════════════════════════════════════════════════════════════════

/// CSV log of [`ProgressPoint`]s
pub struct ProgressLog<W: Write> {
    writer: W,
}

impl ProgressLog<BufWriter<File>> {
    /// Create (or truncate) a log file
    pub fn create(path: impl AsRef<Path>) -> SimResult<Self> {
        let file = File::create(path.as_ref())?;
        Self::new(BufWriter::new(file))
    }
}

impl<W: Write> ProgressLog<W> {
    /// Wrap a writer and emit the header line
    pub fn new(mut writer: W) -> SimResult<Self> {
        writeln!(writer, "{}", PROGRESS_HEADER)?;
        Ok(Self { writer })
    }

    pub fn append(&mut self, point: &ProgressPoint) -> SimResult<()> {
        writeln!(
            self.writer,
            "{},{:.4},{:.4},{:.4},{:.4}",
            point.round, point.rtp, point.hit_rate, point.wild_mode_freq, point.sigma
        )?;
        Ok(())
    }

    pub fn finish(mut self) -> SimResult<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::simulator::Simulator;

    fn sample_run() -> (ParameterSet, SimRun) {
        let params = ParameterSet::standard();
        let sim = Simulator::new(params.clone()).unwrap();
        let run = sim
            .run(&SimConfig::quick().with_spins(2_000).with_shards(2).with_seed(8))
            .unwrap();
        (params, run)
    }

    #[test]
    fn test_text_sections() {
        let (params, run) = sample_run();
        let text = SimReport::new(&params, &run).to_text();
        for section in [
            "=== GENERAL ===",
            "=== RTP BREAKDOWN ===",
            "=== WILD MODE ===",
            "=== CHAIN LENGTHS ===",
            "=== SYMBOL WINS ===",
            "=== PERFORMANCE ===",
        ] {
            assert!(text.contains(section), "missing {}", section);
        }
        assert!(text.contains("Spins:            2000"));
        assert!(text.contains("Seed:             8"));
    }

    #[test]
    fn test_volatility_and_trigger_lines() {
        let params = ParameterSet::standard().with_wild_prob(0.12);
        let sim = Simulator::new(params.clone()).unwrap();
        let run = sim
            .run(&SimConfig::quick().with_spins(2_000).with_shards(2).with_seed(13))
            .unwrap();
        let text = SimReport::new(&params, &run).to_text();

        let sigma = format!(
            "Sigma:            {:.2} ({:.4}x bet)",
            run.stats.std_dev(),
            run.stats.sigma(params.bet)
        );
        assert!(text.contains(&sigma), "missing {}", sigma);
        assert!(text.contains("% (1/"));
        assert!(text.contains("Wilds per trigger:"));
        assert!(!text.contains("Wilds per spin"));
    }

    #[test]
    fn test_json_roundtrip() {
        let (params, run) = sample_run();
        let report = SimReport::new(&params, &run);
        let parsed: SimReport = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(parsed.stats, report.stats);
        assert_eq!(parsed.symbol_names[1], "CROWN");
    }

    #[test]
    fn test_unknown_symbol_name() {
        let (params, run) = sample_run();
        let report = SimReport::new(&params, &run);
        assert_eq!(report.symbol_name(42), "Symbol42");
    }

    #[test]
    fn test_progress_log_format() {
        let mut log = ProgressLog::new(Vec::new()).unwrap();
        log.append(&ProgressPoint {
            round: 1000,
            rtp: 95.5,
            hit_rate: 30.25,
            wild_mode_freq: 1.0,
            sigma: 4.25,
        })
        .unwrap();
        let bytes = log.finish().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(
            text,
            "Round,RTP%,HitRate%,WildModeFreq%,Sigma\n1000,95.5000,30.2500,1.0000,4.2500\n"
        );
    }
}
