/// Rank scores from highest to lowest, 1-based, in input order.
///
/// Tied scores get the mean of the positions they span, truncated toward
/// zero: two scores tied for first are both rank 1, three are all rank 2.
/// Ties are exact `==` comparisons.
pub fn descending_ranks(scores: &[f64]) -> Vec<u32> {
    let n = scores.len();
    let mut order: Vec<usize> = (0..n).collect();
    // Stable, so equal scores keep input order inside their group
    order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));

    let mut ranks = vec![0u32; n];
    let mut i = 0;
    while i < n {
        let mut j = i;
        while j + 1 < n && scores[order[j + 1]] == scores[order[i]] {
            j += 1;
        }
        // Mean of positions i+1..=j+1, floored
        let rank = ((i + 1 + j + 1) / 2) as u32;
        for &idx in &order[i..=j] {
            ranks[idx] = rank;
        }
        i = j + 1;
    }
    ranks
}
