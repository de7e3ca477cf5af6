use crate::mass::MassTable;
use crate::peptide::Peptide;
use crate::spectrum::{cyclic_spectrum, linear_spectrum, Spectrum};
use crate::Error;

/// Scores theoretical spectra against a single experimental spectrum.
///
/// The score is the shared peak count with multiplicity: for every mass in
/// the theoretical spectrum, the smaller of the two multiplicities. The
/// experimental spectrum is borrowed for the lifetime of a search so that
/// thousands of candidates can be scored against it without copying.
pub struct Scorer<'s> {
    pub experimental: &'s Spectrum,
}

impl<'s> Scorer<'s> {
    pub fn new(experimental: &'s Spectrum) -> Self {
        Self { experimental }
    }

    /// Iteration is driven by the theoretical side, which is the smaller,
    /// bounded-size structure. Masses present only experimentally add
    /// nothing.
    pub fn score(&self, theoretical: &Spectrum) -> u32 {
        theoretical
            .iter()
            .map(|(mass, count)| count.min(self.experimental.multiplicity(mass)))
            .sum()
    }

    pub fn linear(&self, peptide: &Peptide) -> u32 {
        self.score(&linear_spectrum(peptide))
    }

    pub fn cyclic(&self, peptide: &Peptide) -> u32 {
        self.score(&cyclic_spectrum(peptide))
    }
}

/// Score an amino-acid sequence against an experimental spectrum by its
/// linear theoretical spectrum. Fails on the first symbol missing from the
/// mass table; there is no partial scoring.
pub fn score_sequence(
    sequence: &str,
    table: &MassTable,
    experimental: &Spectrum,
) -> Result<u32, Error> {
    let masses = sequence
        .bytes()
        .map(|residue| table.mass_of(residue))
        .collect::<Result<Vec<_>, _>>()?;
    let peptide = Peptide::new(masses);
    Ok(Scorer::new(experimental).linear(&peptide))
}
