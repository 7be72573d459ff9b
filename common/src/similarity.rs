//! ゲシュタルト・パターンマッチングによる類似度
//!
//! 最長一致ブロックを再帰的に探し、一致文字数 M から `2M / (|a| + |b|)` を返す。
//! 同じ長さの最長一致が複数ある場合は `a` 側で先に現れるもの、
//! 次に `b` 側で先に現れるものを採用する。

/// 類似度（0.0〜1.0）
///
/// 両方とも空なら 1.0
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    2.0 * matching_characters(&a, &b) as f64 / total as f64
}

/// 文字数だけから求めた類似度の上限
///
/// `ratio(a, b) <= upper_bound(a.len(), b.len())` が常に成り立つ。
pub fn upper_bound(a_len: usize, b_len: usize) -> f64 {
    let total = a_len + b_len;
    if total == 0 {
        return 1.0;
    }
    2.0 * a_len.min(b_len) as f64 / total as f64
}

/// 一致ブロックの文字数合計
fn matching_characters(a: &[char], b: &[char]) -> usize {
    let mut matched = 0;
    let mut pending = vec![(0, a.len(), 0, b.len())];

    while let Some((alo, ahi, blo, bhi)) = pending.pop() {
        let (i, j, k) = longest_match(a, b, alo, ahi, blo, bhi);
        if k == 0 {
            continue;
        }
        matched += k;
        if alo < i && blo < j {
            pending.push((alo, i, blo, j));
        }
        if i + k < ahi && j + k < bhi {
            pending.push((i + k, ahi, j + k, bhi));
        }
    }

    matched
}

/// `a[alo..ahi]` と `b[blo..bhi]` の最長共通部分文字列 `(i, j, len)`
fn longest_match(
    a: &[char],
    b: &[char],
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let width = bhi - blo + 1;
    let mut best = (alo, blo, 0);
    let mut prev = vec![0usize; width];
    let mut cur = vec![0usize; width];

    for i in alo..ahi {
        for j in blo..bhi {
            let col = j - blo + 1;
            if a[i] == b[j] {
                let k = prev[col - 1] + 1;
                cur[col] = k;
                if k > best.2 {
                    best = (i + 1 - k, j + 1 - k, k);
                }
            } else {
                cur[col] = 0;
            }
        }
        std::mem::swap(&mut prev, &mut cur);
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_ratio_identical_and_empty() {
        assert!(approx(ratio("AB123", "AB123"), 1.0));
        assert!(approx(ratio("", ""), 1.0));
        assert!(approx(ratio("AB123", ""), 0.0));
    }

    #[test]
    fn test_ratio_single_substitution() {
        // 5文字中4文字一致
        assert!(approx(ratio("AB12E", "AB123"), 0.8));
        // 7文字中6文字一致
        assert!(approx(ratio("AB1234E", "AB12345"), 12.0 / 14.0));
    }

    #[test]
    fn test_ratio_known_values() {
        assert!(approx(ratio("abcd", "bcde"), 0.75));
        assert!(approx(ratio("ABC", "XYZ"), 0.0));
        // "WIKIM" と "IA" の7文字
        assert!(approx(ratio("WIKIMEDIA", "WIKIMANIA"), 2.0 * 7.0 / 18.0));
    }

    #[test]
    fn test_ratio_exact_boundary_value() {
        let a = "ABCDEFGHIJKLMNOPQRST";
        let b = "ABCD1FGHI2KLMN3PQRST";
        assert_eq!(ratio(a, b), 0.85);
    }

    #[test]
    fn test_ratio_symmetric_for_plates() {
        let pairs = [("AB123", "BA123"), ("XY9876", "XY9867"), ("K1", "1K")];
        for (a, b) in pairs {
            assert!(approx(ratio(a, b), ratio(b, a)), "{} / {}", a, b);
        }
    }

    #[test]
    fn test_upper_bound_dominates_ratio() {
        let pairs = [("AB123", "AB1234567"), ("A", "AAAA"), ("XYZ", "XY")];
        for (a, b) in pairs {
            let bound = upper_bound(a.chars().count(), b.chars().count());
            assert!(ratio(a, b) <= bound + 1e-12);
        }
        assert!(approx(upper_bound(0, 0), 1.0));
        assert!(approx(upper_bound(2, 8), 0.4));
    }
}
