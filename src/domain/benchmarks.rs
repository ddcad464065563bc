//! Ratio and percentage arithmetic behind the dashboard figures.

use super::models::{AgeBucket, BenchmarkStatus, DemographicIndices, Sex};

/// Share of each five-year band in the total population.
pub const AGE_BANDS: [(&str, f64); 17] = [
    ("0-4", 0.065),
    ("5-9", 0.068),
    ("10-14", 0.070),
    ("15-19", 0.072),
    ("20-24", 0.075),
    ("25-29", 0.078),
    ("30-34", 0.076),
    ("35-39", 0.074),
    ("40-44", 0.072),
    ("45-49", 0.070),
    ("50-54", 0.068),
    ("55-59", 0.065),
    ("60-64", 0.060),
    ("65-69", 0.050),
    ("70-74", 0.040),
    ("75-79", 0.030),
    ("80+", 0.020),
];

const MALE_SHARE: f64 = 0.49;
const FEMALE_SHARE: f64 = 0.51;

const WORKING_AGE_START: u32 = 15;
const ELDERLY_START: u32 = 60;

pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// `part / whole * 100`, rounded. Zero when `whole` is zero.
pub fn percentage(part: f64, whole: f64, decimals: u32) -> f64 {
    if whole == 0.0 {
        return 0.0;
    }
    round_to(part / whole * 100.0, decimals)
}

pub fn beds_per_thousand(beds: u64, population: u64) -> f64 {
    if population == 0 {
        return 0.0;
    }
    round_to(beds as f64 / (population as f64 / 1000.0), 2)
}

pub fn compare(municipal: f64, reference: f64) -> BenchmarkStatus {
    if municipal > reference {
        BenchmarkStatus::Acima
    } else {
        BenchmarkStatus::Abaixo
    }
}

/// Splits `total` over the fixed band distribution, men first within each band.
pub fn age_pyramid(total: u64) -> Vec<AgeBucket> {
    let mut pyramid = Vec::with_capacity(AGE_BANDS.len() * 2);
    for (band, share) in AGE_BANDS {
        let band_population = (total as f64 * share) as u64;
        let label = format!("{band} anos");
        pyramid.push(AgeBucket {
            sexo: Sex::Homens,
            idade_grupo: label.clone(),
            populacao: (band_population as f64 * MALE_SHARE) as u64,
        });
        pyramid.push(AgeBucket {
            sexo: Sex::Mulheres,
            idade_grupo: label,
            populacao: (band_population as f64 * FEMALE_SHARE) as u64,
        });
    }
    pyramid
}

fn band_lower_bound(label: &str) -> Option<u32> {
    let digits: String = label.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

/// Children (0-14) and elderly (60+) per working-age person (15-59).
pub fn dependency_indices(pyramid: &[AgeBucket]) -> DemographicIndices {
    let (mut children, mut working_age, mut elderly) = (0u64, 0u64, 0u64);
    for bucket in pyramid {
        match band_lower_bound(&bucket.idade_grupo) {
            Some(start) if start < WORKING_AGE_START => children += bucket.populacao,
            Some(start) if start < ELDERLY_START => working_age += bucket.populacao,
            Some(_) => elderly += bucket.populacao,
            None => {}
        }
    }

    if working_age == 0 {
        return DemographicIndices {
            criancas_pea: 0.0,
            idosos_pea: 0.0,
        };
    }

    DemographicIndices {
        criancas_pea: round_to(children as f64 / working_age as f64, 2),
        idosos_pea: round_to(elderly as f64 / working_age as f64, 2),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage_rounding() {
        assert_eq!(percentage(737_314.0, 46_649_132.0, 2), 1.58);
        assert_eq!(percentage(737_314.0, 213_421_037.0, 4), 0.3455);
        assert_eq!(percentage(10.0, 0.0, 2), 0.0);
    }

    #[test]
    fn test_beds_per_thousand() {
        assert_eq!(beds_per_thousand(1500, 737_314), 2.03);
        assert_eq!(beds_per_thousand(25_000, 12_396_372), 2.02);
        assert_eq!(beds_per_thousand(100, 0), 0.0);
    }

    #[test]
    fn test_compare_is_strict() {
        assert_eq!(compare(2.2, 2.1), BenchmarkStatus::Acima);
        assert_eq!(compare(2.1, 2.1), BenchmarkStatus::Abaixo);
        assert_eq!(compare(1.9, 2.1), BenchmarkStatus::Abaixo);
    }

    #[test]
    fn test_age_pyramid_shape() {
        let pyramid = age_pyramid(1_000_000);
        assert_eq!(pyramid.len(), 34);
        assert_eq!(pyramid[0].sexo, Sex::Homens);
        assert_eq!(pyramid[0].idade_grupo, "0-4 anos");
        assert_eq!(pyramid[0].populacao, 31_850);
        assert_eq!(pyramid[1].sexo, Sex::Mulheres);
        assert_eq!(pyramid[1].populacao, 33_150);
        assert_eq!(pyramid[33].idade_grupo, "80+ anos");
    }

    #[test]
    fn test_dependency_indices() {
        let indices = dependency_indices(&age_pyramid(1_000_000));
        // 203_000 children, 650_000 working age, 200_000 elderly
        assert_eq!(indices.criancas_pea, 0.31);
        assert_eq!(indices.idosos_pea, 0.31);
    }

    #[test]
    fn test_dependency_indices_empty() {
        let indices = dependency_indices(&[]);
        assert_eq!(indices.criancas_pea, 0.0);
        assert_eq!(indices.idosos_pea, 0.0);
    }
}
