//! Normalized string-similarity ratio used by the trigger matcher.
//!
//! This reproduces Python's `difflib.SequenceMatcher.ratio()` exactly: the
//! ratio is `2 * M / T`, where `M` is the total size of the matching blocks
//! found by the recursive longest-matching-block algorithm and `T` is the
//! combined length of both strings. The matcher's 0.8 threshold was tuned
//! against this exact algorithm; a generic edit distance would change which
//! near-miss triggers fire, so this is a faithful port.

use std::collections::HashMap;

/// Similarity ratio between `a` and `b` in `[0, 1]`.
///
/// Two empty strings are considered identical (ratio 1.0). The ratio is
/// computed over Unicode scalar values, matching Python string semantics.
pub fn ratio(a: &str, b: &str) -> f64 {
  let a: Vec<char> = a.chars().collect();
  let b: Vec<char> = b.chars().collect();

  let total = a.len() + b.len();
  if total == 0 {
    return 1.0;
  }

  let matches = matching_len(&a, &b);
  2.0 * matches as f64 / total as f64
}

// ─── Block matching ──────────────────────────────────────────────────────────

/// Index of each element of `b`, with SequenceMatcher's "popular element"
/// heuristic: for sequences of 200+ elements, elements occupying more than 1%
/// of `b` are dropped from the index.
fn index_b(b: &[char]) -> HashMap<char, Vec<usize>> {
  let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
  for (j, &ch) in b.iter().enumerate() {
    b2j.entry(ch).or_default().push(j);
  }

  if b.len() >= 200 {
    let ntest = b.len() / 100 + 1;
    b2j.retain(|_, idxs| idxs.len() <= ntest);
  }

  b2j
}

/// Longest block such that `a[i..i + size] == b[j..j + size]` with
/// `alo <= i < i + size <= ahi` and `blo <= j < j + size <= bhi`.
///
/// Ties break on earliest `i`, then earliest `j`, as in difflib.
fn find_longest_match(
  a: &[char],
  b_raw: &[char],
  b2j: &HashMap<char, Vec<usize>>,
  alo: usize,
  ahi: usize,
  blo: usize,
  bhi: usize,
) -> (usize, usize, usize) {
  let mut besti = alo;
  let mut bestj = blo;
  let mut bestsize = 0usize;

  // j2len[j] = length of the longest block ending at a[i], b[j].
  let mut j2len: HashMap<usize, usize> = HashMap::new();

  for (i, &ch) in a.iter().enumerate().take(ahi).skip(alo) {
    let mut newj2len: HashMap<usize, usize> = HashMap::new();
    if let Some(indices) = b2j.get(&ch) {
      for &j in indices {
        if j < blo {
          continue;
        }
        if j >= bhi {
          break;
        }
        let k = j
          .checked_sub(1)
          .and_then(|prev| j2len.get(&prev).copied())
          .unwrap_or(0)
          + 1;
        newj2len.insert(j, k);
        if k > bestsize {
          besti = i + 1 - k;
          bestj = j + 1 - k;
          bestsize = k;
        }
      }
    }
    j2len = newj2len;
  }

  // Extend the best block over elements the popular-element filter hid from
  // the index. A no-op when the index is complete.
  while besti > alo && bestj > blo && a[besti - 1] == b_raw[bestj - 1] {
    besti -= 1;
    bestj -= 1;
    bestsize += 1;
  }
  while besti + bestsize < ahi
    && bestj + bestsize < bhi
    && a[besti + bestsize] == b_raw[bestj + bestsize]
  {
    bestsize += 1;
  }

  (besti, bestj, bestsize)
}

/// Total length of all matching blocks between `a` and `b`.
///
/// This is difflib's `get_matching_blocks` queue recursion, except only the
/// summed block size is kept — block positions are irrelevant to the ratio.
fn matching_len(a: &[char], b: &[char]) -> usize {
  let b2j = index_b(b);

  let mut queue = vec![(0usize, a.len(), 0usize, b.len())];
  let mut matches = 0usize;

  while let Some((alo, ahi, blo, bhi)) = queue.pop() {
    let (i, j, k) = find_longest_match(a, b, &b2j, alo, ahi, blo, bhi);
    if k > 0 {
      matches += k;
      if alo < i && blo < j {
        queue.push((alo, i, blo, j));
      }
      if i + k < ahi && j + k < bhi {
        queue.push((i + k, ahi, j + k, bhi));
      }
    }
  }

  matches
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::ratio;

  fn close(actual: f64, expected: f64) {
    assert!(
      (actual - expected).abs() < 1e-12,
      "expected {expected}, got {actual}"
    );
  }

  #[test]
  fn identical_strings() {
    close(ratio("train", "train"), 1.0);
  }

  #[test]
  fn both_empty() {
    close(ratio("", ""), 1.0);
  }

  #[test]
  fn one_empty() {
    close(ratio("train", ""), 0.0);
    close(ratio("", "train"), 0.0);
  }

  #[test]
  fn disjoint_alphabets() {
    close(ratio("hello", "train"), 0.0);
  }

  #[test]
  fn plural_is_a_near_miss() {
    // Blocks: "train" (5 chars); T = 11.
    close(ratio("trains", "train"), 10.0 / 11.0);
    close(ratio("train", "trains"), 10.0 / 11.0);
  }

  #[test]
  fn difflib_documentation_example() {
    // difflib finds "ab" and "cd" (M = 4, T = 12).
    close(ratio("qabxcd", "abycdf"), 2.0 / 3.0);
  }

  #[test]
  fn single_char_overlap() {
    close(ratio("i", "train"), 2.0 / 6.0);
  }

  #[test]
  fn off_by_one_insert() {
    close(ratio("apple", "aple"), 8.0 / 9.0);
  }

  #[test]
  fn threshold_boundary_cases() {
    assert!(ratio("space", "spaces") >= 0.8);
    assert!(ratio("space", "pace") >= 0.8);
    assert!(ratio("space", "spa") < 0.8);
  }
}
