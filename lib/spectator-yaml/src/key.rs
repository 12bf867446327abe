/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

/// Config keys are matched case-insensitively, with '-' and '_' treated the same.
pub fn normalize(raw: &str) -> String {
    raw.to_lowercase().replace('-', "_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_case_and_dash() {
        assert_eq!(normalize("Uri"), "uri");
        assert_eq!(normalize("BATCH-SIZE"), "batch_size");
        assert_eq!(normalize("read_timeout"), "read_timeout");
        assert_eq!(normalize("Common-Tags"), "common_tags");
    }
}
