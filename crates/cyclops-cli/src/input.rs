use std::collections::BTreeMap;
use std::io::Read;

use anyhow::{ensure, Context};
use clap::ArgMatches;
use cyclops_core::mass::MassTable;
use cyclops_core::spectrum::Spectrum;

/// Raw command input: the two-line problem text plus the mass table and
/// output options resolved from the command line.
pub struct Input {
    text: String,
    pub table: MassTable,
    pub json: bool,
}

/// Validated parameters for one leaderboard search
pub struct SequenceParams {
    pub limit: usize,
    pub spectrum: Spectrum,
}

/// Validated parameters for one single-peptide scoring pass
pub struct ScoreParams {
    pub peptide: String,
    pub spectrum: Spectrum,
}

impl Input {
    pub fn from_arguments(matches: &ArgMatches) -> anyhow::Result<Self> {
        let text = match matches.get_one::<String>("input") {
            Some(path) => std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read input from `{path}`"))?,
            None => {
                let mut buffer = String::new();
                std::io::stdin()
                    .read_to_string(&mut buffer)
                    .context("Failed to read input from stdin")?;
                buffer
            }
        };

        let table = match matches.get_one::<String>("table") {
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read mass table from `{path}`"))?;
                parse_table(&raw).with_context(|| format!("Invalid mass table in `{path}`"))?
            }
            None => MassTable::default(),
        };

        let json = matches.get_one::<bool>("json").copied().unwrap_or(false);

        Ok(Self { text, table, json })
    }

    pub fn from_text<S: Into<String>>(text: S, table: MassTable) -> Self {
        Self {
            text: text.into(),
            table,
            json: false,
        }
    }

    fn lines(&self) -> anyhow::Result<(&str, &str)> {
        let mut lines = self.text.lines();
        let first = lines.next().context("input is empty; expected two lines")?;
        let second = lines
            .next()
            .context("input ends after one line; expected two")?;
        Ok((first.trim(), second.trim()))
    }

    pub fn sequence(&self) -> anyhow::Result<SequenceParams> {
        let (limit, spectrum) = self.lines()?;
        let limit = limit
            .parse::<usize>()
            .with_context(|| format!("Invalid leaderboard width `{limit}`"))?;
        ensure!(limit >= 1, "leaderboard width must be at least 1");
        Ok(SequenceParams {
            limit,
            spectrum: parse_spectrum(spectrum)?,
        })
    }

    pub fn score(&self) -> anyhow::Result<ScoreParams> {
        let (peptide, spectrum) = self.lines()?;
        ensure!(!peptide.is_empty(), "peptide line is empty");
        Ok(ScoreParams {
            peptide: peptide.to_string(),
            spectrum: parse_spectrum(spectrum)?,
        })
    }
}

fn parse_spectrum(line: &str) -> anyhow::Result<Spectrum> {
    let masses = line
        .split_whitespace()
        .map(|token| {
            token
                .parse::<u32>()
                .with_context(|| format!("Invalid spectrum mass `{token}`"))
        })
        .collect::<anyhow::Result<Vec<u32>>>()?;
    ensure!(!masses.is_empty(), "experimental spectrum line is empty");
    Ok(Spectrum::from_masses(masses))
}

/// A custom mass table is a JSON object of residue symbol to residue mass,
/// e.g. `{"G": 57, "A": 71}`. A BTreeMap keeps duplicate-key detection and
/// error reporting order stable.
pub fn parse_table(raw: &str) -> anyhow::Result<MassTable> {
    let entries: BTreeMap<String, u32> = serde_json::from_str(raw)
        .context("mass table must be a JSON object of residue symbol to integer mass")?;
    ensure!(!entries.is_empty(), "mass table has no residues");
    let mut table = Vec::with_capacity(entries.len());
    for (symbol, mass) in entries {
        ensure!(
            symbol.len() == 1 && symbol.is_ascii(),
            "residue symbol `{symbol}` must be a single ASCII character"
        );
        ensure!(mass > 0, "residue `{symbol}` must have a positive mass");
        table.push((symbol.as_bytes()[0], mass));
    }
    Ok(MassTable::new(table))
}

#[cfg(test)]
mod test {
    use super::{parse_table, Input};
    use cyclops_core::mass::MassTable;

    #[test]
    fn sequence_params() {
        let input = Input::from_text("10\n0 113 128 241\n", MassTable::default());
        let params = input.sequence().unwrap();
        assert_eq!(params.limit, 10);
        assert_eq!(params.spectrum.parent_mass(), Some(241));
        assert_eq!(params.spectrum.peak_count(), 4);
    }

    #[test]
    fn score_params() {
        let input = Input::from_text("NQEL\n0 113 114\n", MassTable::default());
        let params = input.score().unwrap();
        assert_eq!(params.peptide, "NQEL");
        assert_eq!(params.spectrum.peak_count(), 3);
    }

    #[test]
    fn rejects_short_input() {
        let input = Input::from_text("10\n", MassTable::default());
        assert!(input.sequence().is_err());
        assert!(Input::from_text("", MassTable::default()).score().is_err());
    }

    #[test]
    fn rejects_zero_width() {
        let input = Input::from_text("0\n0 57\n", MassTable::default());
        assert!(input.sequence().is_err());
    }

    #[test]
    fn rejects_empty_spectrum_line() {
        let input = Input::from_text("5\n \n", MassTable::default());
        assert!(input.sequence().is_err());
    }

    #[test]
    fn rejects_garbage_masses() {
        let input = Input::from_text("5\n0 57 -4\n", MassTable::default());
        assert!(input.sequence().is_err());
    }

    #[test]
    fn custom_table() {
        let table = parse_table(r#"{"G": 57, "A": 71}"#).unwrap();
        assert_eq!(table.mass_of(b'G'), Ok(57));
        assert_eq!(table.mass_of(b'A'), Ok(71));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn table_validation() {
        assert!(parse_table("{}").is_err());
        assert!(parse_table(r#"{"GA": 128}"#).is_err());
        assert!(parse_table(r#"{"G": 0}"#).is_err());
        assert!(parse_table(r#"["G", 57]"#).is_err());
    }
}
