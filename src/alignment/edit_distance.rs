/// Levenshtein distance between `a` and `b`, giving up once it exceeds `max`.
///
/// Returns `None` when the distance is larger than `max`. Operates on chars,
/// so multi-byte scripts count one edit per letter.
pub fn bounded_levenshtein(a: &str, b: &str, max: usize) -> Option<usize> {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.len().abs_diff(b.len()) > max {
        return None;
    }
    if a.is_empty() || b.is_empty() {
        return Some(a.len().max(b.len()));
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut cur = vec![0usize; b.len() + 1];
    for (i, &ca) in a.iter().enumerate() {
        cur[0] = i + 1;
        let mut row_min = cur[0];
        for (j, &cb) in b.iter().enumerate() {
            let substitution = prev[j] + usize::from(ca != cb);
            cur[j + 1] = substitution.min(prev[j + 1] + 1).min(cur[j] + 1);
            row_min = row_min.min(cur[j + 1]);
        }
        // Every later row is at least this row's minimum.
        if row_min > max {
            return None;
        }
        std::mem::swap(&mut prev, &mut cur);
    }

    let distance = prev[b.len()];
    (distance <= max).then_some(distance)
}

/// Edit budget allowed for a word of `len` chars; `None` for very short words.
pub fn max_edits_for_len(len: usize) -> Option<usize> {
    match len {
        l if l > 3 => Some(3),
        l if l > 2 => Some(2),
        _ => None,
    }
}

/// Whether `b` is within the edit budget of `a`'s length.
pub fn very_similar(a: &str, b: &str) -> bool {
    match max_edits_for_len(a.chars().count()) {
        Some(max) => bounded_levenshtein(a, b, max).is_some(),
        None => false,
    }
}
