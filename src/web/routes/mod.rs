pub mod analysis_routes;
pub mod locality_routes;
pub mod market_routes;

use crate::web::AppError;

/// IBGE municipal codes are numeric; anything else is rejected before any lookup.
/// A numeric code too large to be a municipality is simply unknown.
pub(crate) fn parse_ibge_code(raw: &str) -> Result<u32, AppError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return Err(AppError::InvalidInput(format!("Código IBGE inválido: {raw}")));
    }
    trimmed
        .parse()
        .map_err(|_| AppError::NotFound(format!("Dados não encontrados para o código IBGE: {trimmed}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ibge_code() {
        assert_eq!(parse_ibge_code("3549904").unwrap(), 3549904);
        assert!(parse_ibge_code("abc").is_err());
        assert!(parse_ibge_code("-1").is_err());
        assert!(matches!(parse_ibge_code(""), Err(AppError::InvalidInput(_))));
        assert!(matches!(parse_ibge_code("99999999999"), Err(AppError::NotFound(_))));
    }
}
