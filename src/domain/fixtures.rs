//! Reference figures and sample municipalities.
//!
//! Health-plan (ANS) and labor-market (CAGED) indicators are modeled around
//! these state references; the variation for a municipality is seeded with
//! its IBGE code so repeated lookups return the same figures.

use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::benchmarks::{age_pyramid, beds_per_thousand, compare, dependency_indices, percentage, round_to};
use super::models::{
    Benchmark, Health, HealthPlans, LaborBenchmark, LaborMarket, LegalNature, MarketIntelligence,
    Population, RankedEstablishment,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reference {
    pub populacao: u64,
    pub leitos_por_mil: f64,
    pub cobertura_plano: f64,
    pub salario_medio: f64,
    pub desemprego: f64,
}

pub const NATIONAL_REFERENCE: Reference = Reference {
    populacao: 213_421_037,
    leitos_por_mil: 2.10,
    cobertura_plano: 30.0,
    salario_medio: 2800.0,
    desemprego: 8.5,
};

pub const STATE_REFERENCES: &[(&str, Reference)] = &[
    ("SP", Reference { populacao: 46_649_132, leitos_por_mil: 2.15, cobertura_plano: 45.0, salario_medio: 3200.0, desemprego: 7.5 }),
    ("RJ", Reference { populacao: 17_463_349, leitos_por_mil: 2.05, cobertura_plano: 38.0, salario_medio: 3100.0, desemprego: 8.2 }),
    ("MG", Reference { populacao: 21_411_923, leitos_por_mil: 1.95, cobertura_plano: 32.0, salario_medio: 2800.0, desemprego: 8.8 }),
    ("BA", Reference { populacao: 14_985_284, leitos_por_mil: 1.80, cobertura_plano: 28.0, salario_medio: 2400.0, desemprego: 10.5 }),
    ("PR", Reference { populacao: 11_780_561, leitos_por_mil: 2.10, cobertura_plano: 40.0, salario_medio: 3000.0, desemprego: 7.8 }),
    ("SC", Reference { populacao: 7_252_502, leitos_por_mil: 2.20, cobertura_plano: 42.0, salario_medio: 3100.0, desemprego: 6.5 }),
    ("RS", Reference { populacao: 11_466_630, leitos_por_mil: 2.25, cobertura_plano: 43.0, salario_medio: 3150.0, desemprego: 7.2 }),
    ("PE", Reference { populacao: 9_616_621, leitos_por_mil: 1.75, cobertura_plano: 25.0, salario_medio: 2300.0, desemprego: 11.2 }),
    ("CE", Reference { populacao: 9_240_580, leitos_por_mil: 1.70, cobertura_plano: 23.0, salario_medio: 2250.0, desemprego: 11.8 }),
    ("PA", Reference { populacao: 8_777_124, leitos_por_mil: 1.65, cobertura_plano: 20.0, salario_medio: 2200.0, desemprego: 12.5 }),
];

#[derive(Debug, Clone, Copy)]
pub struct FixtureCity {
    pub ibge: u32,
    pub nome: &'static str,
    pub uf: &'static str,
    pub populacao: u64,
}

const fn city(ibge: u32, nome: &'static str, uf: &'static str, populacao: u64) -> FixtureCity {
    FixtureCity { ibge, nome, uf, populacao }
}

pub const FIXTURE_CITIES: &[FixtureCity] = &[
    city(3550308, "São Paulo", "SP", 12_396_372),
    city(3509502, "Campinas", "SP", 1_213_792),
    city(3549904, "São José dos Campos", "SP", 737_314),
    city(3548500, "Santos", "SP", 433_656),
    city(3552205, "Sorocaba", "SP", 687_357),
    city(3543402, "Ribeirão Preto", "SP", 704_293),
    city(3538709, "Piracicaba", "SP", 400_570),
    city(3525904, "Jundiaí", "SP", 405_532),
    city(3304557, "Rio de Janeiro", "RJ", 6_748_008),
    city(3303302, "Niterói", "RJ", 487_562),
    city(3301702, "Duque de Caxias", "RJ", 872_762),
    city(3304904, "São Gonçalo", "RJ", 1_026_267),
    city(3303500, "Nova Iguaçu", "RJ", 798_067),
    city(3106200, "Belo Horizonte", "MG", 2_530_701),
    city(3170206, "Uberlândia", "MG", 715_259),
    city(3118601, "Contagem", "MG", 645_344),
    city(3136702, "Juiz de Fora", "MG", 573_458),
    city(3143302, "Montes Claros", "MG", 404_693),
    city(2927408, "Salvador", "BA", 2_662_473),
    city(2910800, "Feira de Santana", "BA", 632_079),
    city(2933307, "Vitória da Conquista", "BA", 343_216),
    city(2905701, "Camaçari", "BA", 294_139),
    city(4106902, "Curitiba", "PR", 1_963_726),
    city(4113700, "Londrina", "PR", 569_639),
    city(4115200, "Maringá", "PR", 423_644),
    city(4119905, "Ponta Grossa", "PR", 348_036),
    city(4205407, "Florianópolis", "SC", 537_062),
    city(4209102, "Joinville", "SC", 612_809),
    city(4202404, "Blumenau", "SC", 342_055),
    city(4208203, "Itajaí", "SC", 212_765),
    city(4314902, "Porto Alegre", "RS", 1_409_351),
    city(4305108, "Caxias do Sul", "RS", 488_635),
    city(4314407, "Pelotas", "RS", 348_575),
    city(4316907, "Santa Maria", "RS", 283_437),
    city(2611606, "Recife", "PE", 1_645_727),
    city(2607901, "Jaboatão dos Guararapes", "PE", 684_697),
    city(2609600, "Olinda", "PE", 392_367),
    city(2604106, "Caruaru", "PE", 368_028),
    city(2304400, "Fortaleza", "CE", 2_703_391),
    city(2303709, "Caucaia", "CE", 366_376),
    city(2307304, "Juazeiro do Norte", "CE", 276_055),
    city(2307650, "Maracanaú", "CE", 231_627),
    city(1501402, "Belém", "PA", 1_497_724),
    city(1500800, "Ananindeua", "PA", 529_355),
    city(1506807, "Santarém", "PA", 306_971),
    city(1504208, "Marabá", "PA", 280_360),
];

pub fn state_reference(uf: &str) -> Option<&'static Reference> {
    STATE_REFERENCES
        .iter()
        .find(|(sigla, _)| sigla.eq_ignore_ascii_case(uf))
        .map(|(_, reference)| reference)
}

pub fn find_city(ibge: u32) -> Option<&'static FixtureCity> {
    FIXTURE_CITIES.iter().find(|c| c.ibge == ibge)
}

/// Everything needed to model one municipality.
#[derive(Debug, Clone)]
pub struct ProfileInput<'a> {
    pub ibge: u32,
    pub nome: &'a str,
    pub uf: &'a str,
    pub regiao: &'a str,
    pub populacao: u64,
    pub populacao_uf: u64,
    pub populacao_brasil: u64,
}

fn benchmark(municipal: f64, state: f64, national: f64) -> Benchmark {
    Benchmark {
        municipal,
        estadual: state,
        nacional: national,
        status_estadual: compare(municipal, state),
        status_nacional: compare(municipal, national),
    }
}

fn top_establishments(city_name: &str, population: u64) -> Vec<RankedEstablishment> {
    let beds = |factor: f64| (population as f64 * factor) as u64;
    let mut ranked = vec![
        RankedEstablishment { nome: format!("Hospital Principal {city_name}"), leitos: beds(0.0015), natureza: LegalNature::Public },
        RankedEstablishment { nome: "Hospital Privado A".to_string(), leitos: beds(0.0010), natureza: LegalNature::Private },
        RankedEstablishment { nome: "Hospital Filantrópico B".to_string(), leitos: beds(0.0008), natureza: LegalNature::Philanthropic },
        RankedEstablishment { nome: "Clínica Especializada C".to_string(), leitos: beds(0.0005), natureza: LegalNature::Private },
        RankedEstablishment { nome: "Maternidade D".to_string(), leitos: beds(0.0003), natureza: LegalNature::Public },
    ];
    ranked.sort_by(|a, b| b.leitos.cmp(&a.leitos));
    ranked
}

/// Builds the dashboard record for a municipality from its population and
/// the state/national reference figures.
pub fn profile(input: &ProfileInput<'_>, state: &Reference, national: &Reference) -> MarketIntelligence {
    let mut rng = StdRng::seed_from_u64(u64::from(input.ibge));
    let population = input.populacao;

    let beds_ratio = state.leitos_por_mil + rng.random_range(-0.3..0.3);
    let plan_coverage = round_to(state.cobertura_plano + rng.random_range(-5.0..5.0), 1);
    let salary = round_to(state.salario_medio + rng.random_range(-200.0..200.0), 2);
    let public_beds = round_to(rng.random_range(35.0..50.0), 1);
    let unemployment = round_to(state.desemprego + rng.random_range(-1.0..1.0), 1);
    let monthly_balance: i64 = rng.random_range(-500..=2000);

    let total_beds = (population as f64 * beds_ratio / 1000.0) as u64;
    let beds_per_mil = beds_per_thousand(total_beds, population);

    let pyramid = age_pyramid(population);
    let indices = dependency_indices(&pyramid);

    MarketIntelligence {
        municipio_ibge: input.ibge,
        nome_municipio: input.nome.to_string(),
        uf_sigla: input.uf.to_string(),
        regiao: input.regiao.to_string(),
        fonte_dados: String::new(),
        gerado_em: Utc::now(),
        populacao: Population {
            municipal: population,
            uf: input.populacao_uf,
            brasil: input.populacao_brasil,
            perc_pop_uf: percentage(population as f64, input.populacao_uf as f64, 2),
            perc_pop_brasil: percentage(population as f64, input.populacao_brasil as f64, 4),
            piramide_etaria: pyramid,
            indices_demograficos: indices,
        },
        saude: Health {
            leitos_total: total_beds,
            razao_leitos_por_mil: beds_per_mil,
            leitos_publicos_perc: public_beds,
            leitos_privados_perc: round_to(100.0 - public_beds, 1),
            benchmarking: benchmark(beds_per_mil, state.leitos_por_mil, national.leitos_por_mil),
            top_5_estabelecimentos: top_establishments(input.nome, population),
        },
        planos_saude: HealthPlans {
            beneficiarios: (population as f64 * plan_coverage / 100.0) as u64,
            cobertura_plano_saude_perc: plan_coverage,
            benchmarking: benchmark(plan_coverage, state.cobertura_plano, national.cobertura_plano),
        },
        mercado_trabalho: LaborMarket {
            salario_medio_admissao: salary,
            estoque_empregos: (population as f64 * 0.4) as u64,
            saldo_empregos_mes: monthly_balance,
            taxa_desemprego: unemployment,
            empresas_total: (population as f64 * 0.06) as u64,
            benchmarking: LaborBenchmark {
                salario_municipal: salary,
                salario_estadual: state.salario_medio,
                salario_nacional: national.salario_medio,
                desemprego_municipal: unemployment,
                desemprego_estadual: state.desemprego,
                desemprego_nacional: national.desemprego,
                status_salario_estadual: compare(salary, state.salario_medio),
                status_salario_nacional: compare(salary, national.salario_medio),
            },
        },
        estabelecimentos: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::BenchmarkStatus;
    use std::collections::HashSet;

    fn sjc_input() -> ProfileInput<'static> {
        ProfileInput {
            ibge: 3549904,
            nome: "São José dos Campos",
            uf: "SP",
            regiao: "Sudeste",
            populacao: 737_314,
            populacao_uf: 46_649_132,
            populacao_brasil: NATIONAL_REFERENCE.populacao,
        }
    }

    #[test]
    fn test_every_fixture_city_has_a_state_reference() {
        for city in FIXTURE_CITIES {
            assert!(state_reference(city.uf).is_some(), "missing reference for {}", city.uf);
        }
    }

    #[test]
    fn test_fixture_codes_are_unique() {
        let codes: HashSet<u32> = FIXTURE_CITIES.iter().map(|c| c.ibge).collect();
        assert_eq!(codes.len(), FIXTURE_CITIES.len());
    }

    #[test]
    fn test_profile_is_deterministic() {
        let state = state_reference("SP").unwrap();
        let a = profile(&sjc_input(), state, &NATIONAL_REFERENCE);
        let b = profile(&sjc_input(), state, &NATIONAL_REFERENCE);
        assert_eq!(a.saude.leitos_total, b.saude.leitos_total);
        assert_eq!(a.planos_saude.beneficiarios, b.planos_saude.beneficiarios);
        assert_eq!(a.mercado_trabalho.saldo_empregos_mes, b.mercado_trabalho.saldo_empregos_mes);
    }

    #[test]
    fn test_profile_figures_are_consistent() {
        let state = state_reference("SP").unwrap();
        let record = profile(&sjc_input(), state, &NATIONAL_REFERENCE);

        assert_eq!(record.populacao.perc_pop_uf, 1.58);
        assert_eq!(record.populacao.perc_pop_brasil, 0.3455);

        let beds = &record.saude;
        assert!((beds.razao_leitos_por_mil - state.leitos_por_mil).abs() <= 0.31);
        assert!((beds.leitos_publicos_perc + beds.leitos_privados_perc - 100.0).abs() < 1e-9);
        let expected_status = if beds.razao_leitos_por_mil > state.leitos_por_mil {
            BenchmarkStatus::Acima
        } else {
            BenchmarkStatus::Abaixo
        };
        assert_eq!(beds.benchmarking.status_estadual, expected_status);

        let leitos: Vec<u64> = beds.top_5_estabelecimentos.iter().map(|e| e.leitos).collect();
        let mut sorted = leitos.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(leitos, sorted);

        let labor = &record.mercado_trabalho;
        assert!((-500..=2000).contains(&labor.saldo_empregos_mes));
        assert_eq!(labor.taxa_desemprego, labor.benchmarking.desemprego_municipal);
        assert!(record.estabelecimentos.is_none());
    }
}
