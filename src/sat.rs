use std::collections::HashMap;

use num_bigint::BigUint;

use crate::bdd::Bdd;
use crate::reference::Ref;

impl Bdd {
    /// Counts the satisfying assignments of `node` over `num_vars` variables.
    ///
    /// `num_vars` must cover every variable `node` depends on; usually it is
    /// [`Bdd::num_vars`].
    pub fn sat_count(&self, node: Ref, num_vars: usize) -> BigUint {
        let mut cache = HashMap::new();
        let max = BigUint::from(1u32) << num_vars;
        self.sat_count_(node, &max, &mut cache)
    }

    fn sat_count_(&self, node: Ref, max: &BigUint, cache: &mut HashMap<Ref, BigUint>) -> BigUint {
        if self.is_zero(node) {
            return BigUint::ZERO;
        } else if self.is_one(node) {
            return max.clone();
        }

        if let Some(count) = cache.get(&node) {
            return count.clone();
        }

        let low = self.low(node.id());
        let high = self.high(node.id());

        let count_low = self.sat_count_(low, max, cache);
        let count_high = self.sat_count_(high, max, cache);

        // Children do not depend on this node's variable, so each half of
        // their assignments agrees with the branch taken here.
        let count: BigUint = (count_low + count_high) >> 1;
        let count = if node.is_negated() { max - count } else { count };

        cache.insert(node, count.clone());
        count
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    fn setup(n: usize) -> (Bdd, Vec<Ref>) {
        let bdd = Bdd::default();
        let vars = bdd.allocate(n).unwrap();
        let xs = vars.iter().map(|v| bdd.mk_var(v).unwrap()).collect();
        (bdd, xs)
    }

    fn big(n: u32) -> BigUint {
        BigUint::from(n)
    }

    #[test]
    fn test_sat_count_terminal() {
        let bdd = Bdd::default();

        assert_eq!(bdd.sat_count(bdd.zero(), 1), big(0));
        assert_eq!(bdd.sat_count(bdd.zero(), 3), big(0));

        assert_eq!(bdd.sat_count(bdd.one(), 0), big(1));
        assert_eq!(bdd.sat_count(bdd.one(), 1), big(2));
        assert_eq!(bdd.sat_count(bdd.one(), 3), big(8));
    }

    #[test]
    fn test_sat_count_var() {
        let (bdd, xs) = setup(3);

        assert_eq!(bdd.sat_count(xs[0], 1), big(1));
        assert_eq!(bdd.sat_count(xs[0], 3), big(4));
        assert_eq!(bdd.sat_count(-xs[1], 2), big(2));
        assert_eq!(bdd.sat_count(xs[2], 3), big(4));
    }

    #[test]
    fn test_sat_count_cube() {
        let (bdd, xs) = setup(5);

        let f = bdd.apply_and(xs[0], xs[1]).unwrap();
        assert_eq!(bdd.sat_count(f, 2), big(1));
        assert_eq!(bdd.sat_count(f, 3), big(2));
        assert_eq!(bdd.sat_count(f, 5), big(8));
    }

    #[test]
    fn test_sat_count_clause() {
        let (bdd, xs) = setup(4);

        let f = bdd.apply_or(xs[0], xs[1]).unwrap();
        assert_eq!(bdd.sat_count(f, 2), big(3));
        assert_eq!(bdd.sat_count(f, 3), big(6));
        assert_eq!(bdd.sat_count(f, 4), big(12));
    }

    #[test]
    fn test_sat_count_not_cube() {
        let (bdd, xs) = setup(4);

        let f = -bdd.apply_and(xs[0], xs[1]).unwrap();
        assert_eq!(bdd.sat_count(f, 2), big(3));
        assert_eq!(bdd.sat_count(f, 4), big(12));
    }

    #[test]
    fn test_sat_count_xor_chain() {
        let (bdd, xs) = setup(4);

        let mut f = bdd.zero();
        for &x in &xs {
            f = bdd.apply_xor(f, x).unwrap();
        }
        // Odd parity: half of all assignments.
        assert_eq!(bdd.sat_count(f, 4), big(8));
        assert_eq!(bdd.sat_count(-f, 4), big(8));
    }
}
