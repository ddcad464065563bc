use serde::Serialize;

/// A Brazilian federative unit as listed by IBGE.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct StateInfo {
    pub uf: &'static str,     // e.g. "SP"
    pub name: &'static str,   // e.g. "São Paulo"
    pub ibge_code: u8,        // e.g. 35
    pub region: &'static str, // e.g. "Sudeste"
}

pub const STATES: &[StateInfo] = &[
    StateInfo {
        uf: "AC",
        name: "Acre",
        ibge_code: 12,
        region: "Norte",
    },
    StateInfo {
        uf: "AL",
        name: "Alagoas",
        ibge_code: 27,
        region: "Nordeste",
    },
    StateInfo {
        uf: "AP",
        name: "Amapá",
        ibge_code: 16,
        region: "Norte",
    },
    StateInfo {
        uf: "AM",
        name: "Amazonas",
        ibge_code: 13,
        region: "Norte",
    },
    StateInfo {
        uf: "BA",
        name: "Bahia",
        ibge_code: 29,
        region: "Nordeste",
    },
    StateInfo {
        uf: "CE",
        name: "Ceará",
        ibge_code: 23,
        region: "Nordeste",
    },
    StateInfo {
        uf: "DF",
        name: "Distrito Federal",
        ibge_code: 53,
        region: "Centro-Oeste",
    },
    StateInfo {
        uf: "ES",
        name: "Espírito Santo",
        ibge_code: 32,
        region: "Sudeste",
    },
    StateInfo {
        uf: "GO",
        name: "Goiás",
        ibge_code: 52,
        region: "Centro-Oeste",
    },
    StateInfo {
        uf: "MA",
        name: "Maranhão",
        ibge_code: 21,
        region: "Nordeste",
    },
    StateInfo {
        uf: "MT",
        name: "Mato Grosso",
        ibge_code: 51,
        region: "Centro-Oeste",
    },
    StateInfo {
        uf: "MS",
        name: "Mato Grosso do Sul",
        ibge_code: 50,
        region: "Centro-Oeste",
    },
    StateInfo {
        uf: "MG",
        name: "Minas Gerais",
        ibge_code: 31,
        region: "Sudeste",
    },
    StateInfo {
        uf: "PA",
        name: "Pará",
        ibge_code: 15,
        region: "Norte",
    },
    StateInfo {
        uf: "PB",
        name: "Paraíba",
        ibge_code: 25,
        region: "Nordeste",
    },
    StateInfo {
        uf: "PR",
        name: "Paraná",
        ibge_code: 41,
        region: "Sul",
    },
    StateInfo {
        uf: "PE",
        name: "Pernambuco",
        ibge_code: 26,
        region: "Nordeste",
    },
    StateInfo {
        uf: "PI",
        name: "Piauí",
        ibge_code: 22,
        region: "Nordeste",
    },
    StateInfo {
        uf: "RJ",
        name: "Rio de Janeiro",
        ibge_code: 33,
        region: "Sudeste",
    },
    StateInfo {
        uf: "RN",
        name: "Rio Grande do Norte",
        ibge_code: 24,
        region: "Nordeste",
    },
    StateInfo {
        uf: "RS",
        name: "Rio Grande do Sul",
        ibge_code: 43,
        region: "Sul",
    },
    StateInfo {
        uf: "RO",
        name: "Rondônia",
        ibge_code: 11,
        region: "Norte",
    },
    StateInfo {
        uf: "RR",
        name: "Roraima",
        ibge_code: 14,
        region: "Norte",
    },
    StateInfo {
        uf: "SC",
        name: "Santa Catarina",
        ibge_code: 42,
        region: "Sul",
    },
    StateInfo {
        uf: "SP",
        name: "São Paulo",
        ibge_code: 35,
        region: "Sudeste",
    },
    StateInfo {
        uf: "SE",
        name: "Sergipe",
        ibge_code: 28,
        region: "Nordeste",
    },
    StateInfo {
        uf: "TO",
        name: "Tocantins",
        ibge_code: 17,
        region: "Norte",
    },
];

pub fn find_by_uf(uf: &str) -> Option<&'static StateInfo> {
    STATES.iter().find(|s| s.uf.eq_ignore_ascii_case(uf))
}

/// The first two digits of a 7-digit municipal IBGE code identify the state.
pub fn state_code_of_municipality(ibge_code: u32) -> u8 {
    (ibge_code / 100_000) as u8
}

/// CNES keys municipalities by the IBGE code without its trailing check digit.
pub fn cnes_municipality_code(ibge_code: u32) -> u32 {
    ibge_code / 10
}

/// A UF sigla is two ASCII letters; returns it uppercased.
pub fn normalize_uf(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.len() == 2 && trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
        Some(trimmed.to_ascii_uppercase())
    } else {
        None
    }
}
