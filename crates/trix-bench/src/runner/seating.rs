/// Deterministic agent-to-seat assignments. The first four orders are the
/// cyclic rotations so that a run of four sits every agent in every seat;
/// further orders walk the remaining permutations lexicographically.
pub struct SeatOrders {
    orders: Vec<[usize; 4]>,
}

impl SeatOrders {
    pub const MAX: usize = 24;

    pub fn new(count: usize) -> Self {
        let limit = count.min(Self::MAX);
        let mut orders: Vec<[usize; 4]> = (0..4)
            .map(|shift| std::array::from_fn(|seat| (seat + shift) % 4))
            .collect();
        let mut current = [0usize, 1, 2, 3];
        while orders.len() < limit {
            if !orders.contains(&current) {
                orders.push(current);
            }
            if !next_permutation(&mut current) {
                break;
            }
        }
        orders.truncate(limit);
        Self { orders }
    }

    pub fn as_slice(&self) -> &[[usize; 4]] {
        &self.orders
    }
}

fn next_permutation(values: &mut [usize; 4]) -> bool {
    let Some(pivot) = (0..values.len() - 1).rev().find(|&i| values[i] < values[i + 1]) else {
        return false;
    };
    let Some(swap) = (pivot + 1..values.len()).rev().find(|&j| values[j] > values[pivot]) else {
        return false;
    };
    values.swap(pivot, swap);
    values[pivot + 1..].reverse();
    true
}
