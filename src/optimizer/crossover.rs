//! Order-Crossover-Variant (spec.md §4.2): an OX-like operator that copies
//! a possibly-reversed fragment of parent B into a random child position
//! and fills the gaps from parent A in its original order. Ported from
//! `examples/original_source/ga.h`'s `Optimizer<T>::crossover`.

use rand::Rng;

/// `present` must have length `pa.len()`; callers reuse it across calls to
/// avoid reallocating per crossover (spec.md §3 "Thread state").
pub fn order_crossover(pa: &[u32], pb: &[u32], rng: &mut impl Rng, present: &mut [bool]) -> Vec<u32> {
    let n = pa.len();
    debug_assert_eq!(pb.len(), n);
    debug_assert_eq!(present.len(), n);

    for p in present.iter_mut() {
        *p = false;
    }

    let f_start = rng.gen_range(0..n);
    let f_end = rng.gen_range(0..n);
    let f_len = if f_end >= f_start {
        f_end - f_start + 1
    } else {
        f_start - f_end + 1
    };
    let c0 = rng.gen_range(0..=(n - f_len));

    let mut child = vec![0u32; n];
    let mut ci = c0;
    if f_start <= f_end {
        for p1i in f_start..=f_end {
            let gene = pb[p1i];
            child[ci] = gene;
            present[gene as usize] = true;
            ci += 1;
        }
    } else {
        let mut p1i = f_start as isize;
        while p1i >= f_end as isize {
            let gene = pb[p1i as usize];
            child[ci] = gene;
            present[gene as usize] = true;
            ci += 1;
            p1i -= 1;
        }
    }
    let c1 = ci;

    let mut p0i = 0usize;
    for slot in child.iter_mut().take(c0) {
        while present[pa[p0i] as usize] {
            p0i += 1;
        }
        *slot = pa[p0i];
        p0i += 1;
    }
    for slot in child[c1..n].iter_mut() {
        while present[pa[p0i] as usize] {
            p0i += 1;
        }
        *slot = pa[p0i];
        p0i += 1;
    }

    child
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn is_permutation(v: &[u32]) -> bool {
        let mut seen = vec![false; v.len()];
        for &g in v {
            let g = g as usize;
            if g >= v.len() || seen[g] {
                return false;
            }
            seen[g] = true;
        }
        true
    }

    #[test]
    fn child_is_always_a_permutation() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for &n in &[2usize, 5, 144] {
            let pa: Vec<u32> = (0..n as u32).collect();
            let mut pb = pa.clone();
            for _ in 0..1000 {
                use rand::seq::SliceRandom;
                pb.shuffle(&mut rng);
                let mut present = vec![false; n];
                let child = order_crossover(&pa, &pb, &mut rng, &mut present);
                assert!(is_permutation(&child), "not a permutation: {child:?}");
            }
        }
    }

    #[test]
    fn reversed_fragment_is_observable() {
        // Force fStart > fEnd by constructing a deterministic scenario via
        // direct fragment logic (the public function draws its own
        // f_start/f_end, so we exercise both orientations through repeated
        // sampling and check we see a reversed read at least once).
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let pa: Vec<u32> = (0..6).collect();
        let pb: Vec<u32> = vec![5, 4, 3, 2, 1, 0];
        let mut present = vec![false; 6];
        let mut saw_reversed_subsequence = false;
        for _ in 0..200 {
            let child = order_crossover(&pa, &pb, &mut rng, &mut present);
            assert!(is_permutation(&child));
            // pb is itself the reverse of pa; any fragment copied forward
            // from pb reads as a descending run, any fragment read backward
            // from pb (fStart > fEnd) reads as an ascending run; both are
            // observable as contiguous runs inside the child.
            if child.windows(2).any(|w| w[0] + 1 == w[1]) {
                saw_reversed_subsequence = true;
            }
        }
        assert!(saw_reversed_subsequence);
    }

    #[test]
    fn single_length_fragment_still_valid() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let pa: Vec<u32> = (0..4).collect();
        let pb: Vec<u32> = vec![3, 1, 2, 0];
        let mut present = vec![false; 4];
        for _ in 0..50 {
            let child = order_crossover(&pa, &pb, &mut rng, &mut present);
            assert!(is_permutation(&child));
        }
    }
}
