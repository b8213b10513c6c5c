use anyhow::{Context, Result, bail};

/// Split a comma-separated argument, trimming blanks.
pub fn split_csv(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Resolve CLI seed tokens into run seeds.
///
/// Accepts decimal or `0x`-prefixed hex integers. `None` means "use the scenario seed", which
/// yields a single run.
pub fn resolve_seed_inputs(raw: Option<&str>) -> Result<Vec<Option<u64>>> {
    let Some(raw) = raw else {
        return Ok(vec![None]);
    };
    let tokens = split_csv(raw);
    if tokens.is_empty() {
        bail!("no seeds given in {raw:?}");
    }
    tokens
        .iter()
        .map(|token| parse_seed(token).map(Some))
        .collect()
}

fn parse_seed(token: &str) -> Result<u64> {
    if let Some(hex) = token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
    {
        return u64::from_str_radix(&hex.replace('_', ""), 16)
            .with_context(|| format!("invalid hex seed {token:?}"));
    }
    token
        .replace('_', "")
        .parse::<u64>()
        .with_context(|| format!("invalid seed {token:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_csv_drops_blanks() {
        assert_eq!(split_csv(" 1, ,2,"), vec!["1".to_string(), "2".to_string()]);
    }

    #[test]
    fn resolves_decimal_and_hex_seeds() {
        let seeds = resolve_seed_inputs(Some("1337,0xFF,1_000")).unwrap();
        assert_eq!(seeds, vec![Some(1337), Some(255), Some(1000)]);
    }

    #[test]
    fn missing_seeds_defer_to_scenario() {
        assert_eq!(resolve_seed_inputs(None).unwrap(), vec![None]);
    }

    #[test]
    fn rejects_garbage_and_empty_lists() {
        assert!(resolve_seed_inputs(Some("abc")).is_err());
        assert!(resolve_seed_inputs(Some(" , ")).is_err());
        let err = resolve_seed_inputs(Some("0xZZ")).unwrap_err();
        assert!(format!("{err:#}").contains("invalid hex seed"));
    }
}
