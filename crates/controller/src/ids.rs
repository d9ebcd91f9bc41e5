// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Correlation identifiers for credential exchanges.

/// Mint a fresh opaque identifier (random UUIDv4, hyphenated).
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn ids_do_not_collide() {
        let ids: HashSet<String> = (0..50_000).map(|_| new_id()).collect();
        assert_eq!(ids.len(), 50_000);
    }

    #[test]
    fn ids_are_parseable_uuids() -> anyhow::Result<()> {
        let id = new_id();
        let parsed = uuid::Uuid::parse_str(&id)?;
        assert_eq!(parsed.get_version_num(), 4);
        Ok(())
    }

    #[tokio::test]
    async fn ids_from_concurrent_tasks_do_not_collide() -> anyhow::Result<()> {
        let mut tasks = tokio::task::JoinSet::new();
        for _ in 0..8 {
            tasks.spawn(async { (0..1_000).map(|_| new_id()).collect::<Vec<_>>() });
        }
        let mut seen = HashSet::new();
        while let Some(batch) = tasks.join_next().await {
            for id in batch? {
                assert!(seen.insert(id), "duplicate id minted");
            }
        }
        assert_eq!(seen.len(), 8_000);
        Ok(())
    }
}
