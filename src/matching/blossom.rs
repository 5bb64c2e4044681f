//! Edmonds' weighted blossom algorithm for maximum weight matchings in general graphs.
//!
//! The implementation is the classical O(n³) primal-dual scheme: each stage grows alternating
//! trees from all free vertices, shrinks odd cycles (blossoms) as they appear, and adjusts the
//! dual variables until an augmenting path becomes tight. Vertices are `0..n`, blossoms
//! `n..2n`. All arithmetic is on `i64`; integer weights keep every slack even, so all dual
//! updates are exact.
//!
//! Edge endpoints are addressed as `p = 2k` / `p = 2k + 1` for the two ends of edge `k`, so
//! `p ^ 1` is the opposite end.

use crate::{
    algorithm::{Interrupt, Phase},
    errors::Result,
    graph::Node,
};

pub type IntWeight = i64;

const FREE: u8 = 0;
const S_LABEL: u8 = 1;
const T_LABEL: u8 = 2;
/// Temporary mark used while scanning for the common ancestor of two S-vertices
const BREADCRUMB: u8 = 5;

/// Computes a maximum weight matching of the graph over `0..n` with the given weighted edges.
/// If `max_cardinality` is set, only maximum cardinality matchings are considered.
///
/// Returns the mate of each vertex (or `None` if unmatched). The interrupt is polled once per
/// stage; a triggered interrupt yields [`crate::errors::TspError::Timeout`].
pub fn maximum_weight_matching(
    n: usize,
    edges: &[(Node, Node, IntWeight)],
    max_cardinality: bool,
    interrupt: &impl Interrupt,
) -> Result<Vec<Option<Node>>> {
    if edges.is_empty() {
        return Ok(vec![None; n]);
    }

    let mut state = BlossomState::new(n, edges);
    for _ in 0..n {
        interrupt.check(Phase::Matching)?;
        if !state.stage(max_cardinality) {
            break;
        }
    }

    Ok((0..n)
        .map(|v| state.mate[v].map(|p| state.endpoint[p] as Node))
        .collect())
}

struct BlossomState {
    n: usize,
    edges: Vec<(usize, usize, IntWeight)>,

    /// `endpoint[p]` is the vertex to which endpoint `p` is attached
    endpoint: Vec<usize>,
    /// remote endpoints of the edges incident to each vertex
    neighbend: Vec<Vec<usize>>,
    /// remote endpoint of the matched edge of each vertex
    mate: Vec<Option<usize>>,

    label: Vec<u8>,
    /// endpoint through which a blossom (or vertex) got its label
    labelend: Vec<Option<usize>>,
    /// top-level blossom containing each vertex
    inblossom: Vec<usize>,

    blossomparent: Vec<Option<usize>>,
    blossomchilds: Vec<Vec<usize>>,
    /// `None` marks an unused blossom slot
    blossombase: Vec<Option<usize>>,
    /// `blossomendps[b][i]` connects `blossomchilds[b][i]` to `blossomchilds[b][i + 1]`
    blossomendps: Vec<Vec<usize>>,

    /// least-slack edge to a different S-blossom (for S-blossoms) or to any S-vertex
    bestedge: Vec<Option<usize>>,
    blossombestedges: Vec<Option<Vec<usize>>>,
    unusedblossoms: Vec<usize>,

    dualvar: Vec<IntWeight>,
    allowedge: Vec<bool>,
    queue: Vec<usize>,
}

impl BlossomState {
    fn new(n: usize, edges: &[(Node, Node, IntWeight)]) -> Self {
        let edges: Vec<_> = edges
            .iter()
            .map(|&(u, v, w)| (u as usize, v as usize, w))
            .collect();
        let max_weight = edges.iter().map(|e| e.2).max().unwrap_or(0).max(0);

        let endpoint = (0..2 * edges.len())
            .map(|p| {
                let (i, j, _) = edges[p / 2];
                if p % 2 == 0 { i } else { j }
            })
            .collect();

        let mut neighbend = vec![Vec::new(); n];
        for (k, &(i, j, _)) in edges.iter().enumerate() {
            neighbend[i].push(2 * k + 1);
            neighbend[j].push(2 * k);
        }

        let mut dualvar = vec![max_weight; n];
        dualvar.resize(2 * n, 0);

        Self {
            n,
            endpoint,
            neighbend,
            mate: vec![None; n],
            label: vec![FREE; 2 * n],
            labelend: vec![None; 2 * n],
            inblossom: (0..n).collect(),
            blossomparent: vec![None; 2 * n],
            blossomchilds: vec![Vec::new(); 2 * n],
            blossombase: (0..n).map(Some).chain((0..n).map(|_| None)).collect(),
            blossomendps: vec![Vec::new(); 2 * n],
            bestedge: vec![None; 2 * n],
            blossombestedges: vec![None; 2 * n],
            unusedblossoms: (n..2 * n).collect(),
            dualvar,
            allowedge: vec![false; edges.len()],
            queue: Vec::new(),
            edges,
        }
    }

    fn slack(&self, k: usize) -> IntWeight {
        let (i, j, w) = self.edges[k];
        self.dualvar[i] + self.dualvar[j] - 2 * w
    }

    /// All vertices contained (possibly nested) in blossom `b`
    fn leaves(&self, b: usize) -> Vec<usize> {
        let mut result = Vec::new();
        let mut stack = vec![b];
        while let Some(t) = stack.pop() {
            if t < self.n {
                result.push(t);
            } else {
                stack.extend(self.blossomchilds[t].iter().rev());
            }
        }
        result
    }

    fn assign_label(&mut self, w: usize, t: u8, p: Option<usize>) {
        let b = self.inblossom[w];
        debug_assert!(self.label[w] == FREE && self.label[b] == FREE);

        self.label[w] = t;
        self.label[b] = t;
        self.labelend[w] = p;
        self.labelend[b] = p;
        self.bestedge[w] = None;
        self.bestedge[b] = None;

        if t == S_LABEL {
            let leaves = self.leaves(b);
            self.queue.extend(leaves);
        } else if t == T_LABEL {
            // the base of a T-blossom is always matched; its mate becomes an S-vertex
            let base = self.blossombase[b].expect("labelled blossom has a base");
            let mate = self.mate[base].expect("base of a T-blossom is matched");
            self.assign_label(self.endpoint[mate], S_LABEL, Some(mate ^ 1));
        }
    }

    /// Traces back from S-vertices `v` and `w` to discover either a new blossom (returning its
    /// base) or an augmenting path (returning `None`)
    fn scan_blossom(&mut self, v: usize, w: usize) -> Option<usize> {
        let mut path = Vec::new();
        let mut base = None;
        let mut v = Some(v);
        let mut w = Some(w);

        while let Some(cur) = v {
            let b = self.inblossom[cur];
            if self.label[b] & 4 != 0 {
                base = self.blossombase[b];
                break;
            }
            debug_assert_eq!(self.label[b], S_LABEL);
            path.push(b);
            self.label[b] = BREADCRUMB;

            v = match self.labelend[b] {
                None => None, // reached the root
                Some(p) => {
                    let t = self.inblossom[self.endpoint[p]];
                    debug_assert_eq!(self.label[t], T_LABEL);
                    self.labelend[t].map(|q| self.endpoint[q])
                }
            };

            if w.is_some() {
                std::mem::swap(&mut v, &mut w);
            }
        }

        for b in path {
            self.label[b] = S_LABEL;
        }

        base
    }

    /// Constructs a new blossom with the given base, containing edge `k` which connects a pair
    /// of S-vertices
    fn add_blossom(&mut self, base: usize, k: usize) {
        let (mut v, mut w, _) = self.edges[k];
        let bb = self.inblossom[base];
        let mut bv = self.inblossom[v];
        let mut bw = self.inblossom[w];

        let b = self
            .unusedblossoms
            .pop()
            .expect("at most n/2 nested blossoms exist at any time");
        self.blossombase[b] = Some(base);
        self.blossomparent[b] = None;
        self.blossomparent[bb] = Some(b);

        let mut path = Vec::new();
        let mut endps = Vec::new();

        // trace back from v to base
        while bv != bb {
            self.blossomparent[bv] = Some(b);
            path.push(bv);
            let p = self.labelend[bv].expect("non-base S-blossom has a label edge");
            endps.push(p);
            v = self.endpoint[p];
            bv = self.inblossom[v];
        }

        path.push(bb);
        path.reverse();
        endps.reverse();
        endps.push(2 * k);

        // trace back from w to base
        while bw != bb {
            self.blossomparent[bw] = Some(b);
            path.push(bw);
            let p = self.labelend[bw].expect("non-base S-blossom has a label edge");
            endps.push(p ^ 1);
            w = self.endpoint[p];
            bw = self.inblossom[w];
        }

        self.label[b] = S_LABEL;
        self.labelend[b] = self.labelend[bb];
        self.dualvar[b] = 0;
        self.blossomchilds[b] = path.clone();
        self.blossomendps[b] = endps;

        // former T-vertices become S-vertices and must be scanned
        for leaf in self.leaves(b) {
            if self.label[self.inblossom[leaf]] == T_LABEL {
                self.queue.push(leaf);
            }
            self.inblossom[leaf] = b;
        }

        // compute the least-slack edges to neighbouring S-blossoms
        let mut bestedgeto: Vec<Option<usize>> = vec![None; 2 * self.n];
        for &child in &path {
            let candidates: Vec<usize> = match self.blossombestedges[child].take() {
                Some(list) => list,
                None => self
                    .leaves(child)
                    .into_iter()
                    .flat_map(|leaf| self.neighbend[leaf].iter().map(|&p| p / 2))
                    .collect(),
            };

            for k in candidates {
                let (mut i, mut j, _) = self.edges[k];
                if self.inblossom[j] == b {
                    std::mem::swap(&mut i, &mut j);
                }
                debug_assert_eq!(self.inblossom[i], b);
                let bj = self.inblossom[j];
                if bj != b
                    && self.label[bj] == S_LABEL
                    && bestedgeto[bj].is_none_or(|best| self.slack(k) < self.slack(best))
                {
                    bestedgeto[bj] = Some(k);
                }
            }

            self.bestedge[child] = None;
        }

        let best_list: Vec<usize> = bestedgeto.into_iter().flatten().collect();
        self.bestedge[b] = None;
        for &k in &best_list {
            if self.bestedge[b].is_none_or(|best| self.slack(k) < self.slack(best)) {
                self.bestedge[b] = Some(k);
            }
        }
        self.blossombestedges[b] = Some(best_list);
    }

    /// Index into a child list, counting negative positions from the back
    fn wrap(len: usize, j: isize) -> usize {
        j.rem_euclid(len as isize) as usize
    }

    /// Expands the top-level blossom `b`
    fn expand_blossom(&mut self, b: usize, endstage: bool) {
        let childs = self.blossomchilds[b].clone();

        for &s in &childs {
            self.blossomparent[s] = None;
            if s < self.n {
                self.inblossom[s] = s;
            } else if endstage && self.dualvar[s] == 0 {
                self.expand_blossom(s, endstage);
            } else {
                for leaf in self.leaves(s) {
                    self.inblossom[leaf] = s;
                }
            }
        }

        // if we expand a T-blossom during a stage, its children must be relabelled
        if !endstage && self.label[b] == T_LABEL {
            let len = childs.len();
            let endps = self.blossomendps[b].clone();
            let at = |j: isize| childs[Self::wrap(len, j)];
            let endp = |j: isize| endps[Self::wrap(len, j)];

            let labelend_b = self.labelend[b].expect("T-blossom has a label edge");
            let entrychild = self.inblossom[self.endpoint[labelend_b ^ 1]];

            // walk from the entry child to the base along the even-length side
            let mut j = childs
                .iter()
                .position(|&c| c == entrychild)
                .expect("entry child belongs to the blossom") as isize;
            let (jstep, endptrick) = if j & 1 == 1 {
                j -= len as isize;
                (1, 0)
            } else {
                (-1, 1)
            };

            let mut p = labelend_b;
            while j != 0 {
                // relabel the T-sub-blossom
                self.label[self.endpoint[p ^ 1]] = FREE;
                self.label[self.endpoint[endp(j - endptrick) ^ endptrick as usize ^ 1]] = FREE;
                self.assign_label(self.endpoint[p ^ 1], T_LABEL, Some(p));

                // step to the next S-sub-blossom and note its forward endpoint
                self.allowedge[endp(j - endptrick) / 2] = true;
                j += jstep;
                p = endp(j - endptrick) ^ endptrick as usize;

                // step to the next T-sub-blossom
                self.allowedge[p / 2] = true;
                j += jstep;
            }

            // relabel the base T-sub-blossom without creating S-vertices
            let bv = at(j);
            self.label[self.endpoint[p ^ 1]] = T_LABEL;
            self.label[bv] = T_LABEL;
            self.labelend[self.endpoint[p ^ 1]] = Some(p);
            self.labelend[bv] = Some(p);
            self.bestedge[bv] = None;

            // the remaining children on the odd side become free unless reached from outside
            j += jstep;
            while at(j) != entrychild {
                let bv = at(j);
                if self.label[bv] == S_LABEL {
                    // reached through its own bestedge; already an S-blossom
                    j += jstep;
                    continue;
                }

                let reached = self
                    .leaves(bv)
                    .into_iter()
                    .find(|&leaf| self.label[leaf] != FREE);
                if let Some(v) = reached {
                    debug_assert_eq!(self.label[v], T_LABEL);
                    debug_assert_eq!(self.inblossom[v], bv);
                    self.label[v] = FREE;
                    let base = self.blossombase[bv].expect("child blossom has a base");
                    let mate = self.mate[base].expect("base of a sub-blossom is matched");
                    self.label[self.endpoint[mate]] = FREE;
                    let labelend_v = self.labelend[v];
                    self.assign_label(v, T_LABEL, labelend_v);
                }
                j += jstep;
            }
        }

        self.label[b] = FREE;
        self.labelend[b] = None;
        self.blossomchilds[b].clear();
        self.blossomendps[b].clear();
        self.blossombase[b] = None;
        self.blossombestedges[b] = None;
        self.bestedge[b] = None;
        self.unusedblossoms.push(b);
    }

    /// Swaps matched and unmatched edges on the path through blossom `b` between vertex `v`
    /// and the base
    fn augment_blossom(&mut self, b: usize, v: usize) {
        // find the immediate child of b containing v
        let mut t = v;
        while self.blossomparent[t] != Some(b) {
            t = self.blossomparent[t].expect("vertex is nested in the blossom");
        }
        if t >= self.n {
            self.augment_blossom(t, v);
        }

        let len = self.blossomchilds[b].len();
        let i = self.blossomchilds[b]
            .iter()
            .position(|&c| c == t)
            .expect("child belongs to the blossom");
        let mut j = i as isize;
        let (jstep, endptrick) = if i & 1 == 1 {
            j -= len as isize;
            (1, 0)
        } else {
            (-1, 1)
        };

        // move along the blossom until we get to the base
        while j != 0 {
            j += jstep;
            let t = self.blossomchilds[b][Self::wrap(len, j)];
            let p = self.blossomendps[b][Self::wrap(len, j - endptrick)] ^ endptrick as usize;
            if t >= self.n {
                self.augment_blossom(t, self.endpoint[p]);
            }

            j += jstep;
            let t = self.blossomchilds[b][Self::wrap(len, j)];
            if t >= self.n {
                self.augment_blossom(t, self.endpoint[p ^ 1]);
            }

            self.mate[self.endpoint[p]] = Some(p ^ 1);
            self.mate[self.endpoint[p ^ 1]] = Some(p);
        }

        // rotate the child list so the new base comes first
        self.blossomchilds[b].rotate_left(i);
        self.blossomendps[b].rotate_left(i);
        self.blossombase[b] = self.blossombase[self.blossomchilds[b][0]];
        debug_assert_eq!(self.blossombase[b], Some(v));
    }

    /// Swaps matched and unmatched edges along the augmenting path through edge `k`
    fn augment_matching(&mut self, k: usize) {
        let (v, w, _) = self.edges[k];

        for (mut s, mut p) in [(v, 2 * k + 1), (w, 2 * k)] {
            loop {
                let bs = self.inblossom[s];
                debug_assert_eq!(self.label[bs], S_LABEL);
                if bs >= self.n {
                    self.augment_blossom(bs, s);
                }
                self.mate[s] = Some(p);

                // the root of the tree is reached
                let Some(labelend_bs) = self.labelend[bs] else {
                    break;
                };

                let t = self.endpoint[labelend_bs];
                let bt = self.inblossom[t];
                debug_assert_eq!(self.label[bt], T_LABEL);

                let labelend_bt = self.labelend[bt].expect("T-blossom has a label edge");
                s = self.endpoint[labelend_bt];
                let j = self.endpoint[labelend_bt ^ 1];
                debug_assert_eq!(self.blossombase[bt], Some(t));
                if bt >= self.n {
                    self.augment_blossom(bt, j);
                }
                self.mate[j] = Some(labelend_bt);
                p = labelend_bt ^ 1;
            }
        }
    }

    fn update_best(&mut self, slot: usize, k: usize, kslack: IntWeight) {
        if self.bestedge[slot].is_none_or(|best| kslack < self.slack(best)) {
            self.bestedge[slot] = Some(k);
        }
    }

    /// Runs one stage; returns false iff no augmenting path was found, i.e. the matching is optimal
    fn stage(&mut self, max_cardinality: bool) -> bool {
        let n = self.n;

        self.label.fill(FREE);
        self.bestedge.fill(None);
        for slot in &mut self.blossombestedges[n..] {
            *slot = None;
        }
        self.allowedge.fill(false);
        self.queue.clear();

        for v in 0..n {
            if self.mate[v].is_none() && self.label[self.inblossom[v]] == FREE {
                self.assign_label(v, S_LABEL, None);
            }
        }

        let augmented = 'search: loop {
            // grow the alternating forest along tight edges
            while let Some(v) = self.queue.pop() {
                for idx in 0..self.neighbend[v].len() {
                    let p = self.neighbend[v][idx];
                    let k = p / 2;
                    let w = self.endpoint[p];

                    if self.inblossom[v] == self.inblossom[w] {
                        continue;
                    }

                    let mut kslack = 0;
                    if !self.allowedge[k] {
                        kslack = self.slack(k);
                        if kslack <= 0 {
                            self.allowedge[k] = true;
                        }
                    }

                    let bw = self.inblossom[w];
                    if self.allowedge[k] {
                        if self.label[bw] == FREE {
                            self.assign_label(w, T_LABEL, Some(p ^ 1));
                        } else if self.label[bw] == S_LABEL {
                            match self.scan_blossom(v, w) {
                                Some(base) => self.add_blossom(base, k),
                                None => {
                                    self.augment_matching(k);
                                    break 'search true;
                                }
                            }
                        } else if self.label[w] == FREE {
                            // w lies in a T-blossom but was not reached yet
                            debug_assert_eq!(self.label[bw], T_LABEL);
                            self.label[w] = T_LABEL;
                            self.labelend[w] = Some(p ^ 1);
                        }
                    } else if self.label[bw] == S_LABEL {
                        let bv = self.inblossom[v];
                        self.update_best(bv, k, kslack);
                    } else if self.label[w] == FREE {
                        self.update_best(w, k, kslack);
                    }
                }
            }

            // no tight edge left; compute the dual adjustment
            enum Delta {
                Free,
                Edge(usize),
                Blossom(usize),
            }
            let mut best: Option<(IntWeight, Delta)> = None;
            let offer = |best: &mut Option<(IntWeight, Delta)>, d: IntWeight, what: Delta| {
                if best.as_ref().is_none_or(|(delta, _)| d < *delta) {
                    *best = Some((d, what));
                }
            };

            if !max_cardinality {
                let d = self.dualvar[..n].iter().copied().min().unwrap_or(0);
                offer(&mut best, d, Delta::Free);
            }

            // free vertex adjacent to an S-vertex
            for v in 0..n {
                if self.label[self.inblossom[v]] != FREE {
                    continue;
                }
                if let Some(k) = self.bestedge[v] {
                    offer(&mut best, self.slack(k), Delta::Edge(k));
                }
            }

            // two S-blossoms joined by an edge
            for b in 0..2 * n {
                if self.blossomparent[b].is_some() || self.label[b] != S_LABEL {
                    continue;
                }
                if let Some(k) = self.bestedge[b] {
                    let kslack = self.slack(k);
                    debug_assert_eq!(kslack % 2, 0);
                    offer(&mut best, kslack / 2, Delta::Edge(k));
                }
            }

            // T-blossom whose dual would become negative
            for b in n..2 * n {
                if self.blossombase[b].is_some()
                    && self.blossomparent[b].is_none()
                    && self.label[b] == T_LABEL
                {
                    offer(&mut best, self.dualvar[b], Delta::Blossom(b));
                }
            }

            let (delta, what) = match best {
                Some(choice) => choice,
                None => {
                    // no further improvement possible; max-cardinality optimum reached
                    let d = self.dualvar[..n].iter().copied().min().unwrap_or(0).max(0);
                    (d, Delta::Free)
                }
            };

            for v in 0..n {
                match self.label[self.inblossom[v]] {
                    S_LABEL => self.dualvar[v] -= delta,
                    T_LABEL => self.dualvar[v] += delta,
                    _ => {}
                }
            }
            for b in n..2 * n {
                if self.blossombase[b].is_some() && self.blossomparent[b].is_none() {
                    match self.label[b] {
                        S_LABEL => self.dualvar[b] += delta,
                        T_LABEL => self.dualvar[b] -= delta,
                        _ => {}
                    }
                }
            }

            match what {
                Delta::Free => break 'search false,
                Delta::Edge(k) => {
                    self.allowedge[k] = true;
                    let (mut i, j, _) = self.edges[k];
                    if self.label[self.inblossom[i]] == FREE {
                        i = j;
                    }
                    debug_assert_eq!(self.label[self.inblossom[i]], S_LABEL);
                    self.queue.push(i);
                }
                Delta::Blossom(b) => self.expand_blossom(b, false),
            }
        };

        if !augmented {
            return false;
        }

        // S-blossoms whose dual dropped to zero are dissolved before the next stage
        for b in n..2 * n {
            if self.blossomparent[b].is_none()
                && self.blossombase[b].is_some()
                && self.label[b] == S_LABEL
                && self.dualvar[b] == 0
            {
                self.expand_blossom(b, true);
            }
        }

        true
    }
}
