// BSD 3-Clause License
//
// Copyright (c) 2025, BlackPortal ○
//
// Redistribution and use in source and binary forms, with or without
// modification, are permitted provided that the following conditions are met:
//
// 1. Redistributions of source code must retain the above copyright notice, this
//    list of conditions and the following disclaimer.
//
// 2. Redistributions in binary form must reproduce the above copyright notice,
//    this list of conditions and the following disclaimer in the documentation
//    and/or other materials provided with the distribution.
//
// 3. Neither the name of the copyright holder nor the names of its
//    contributors may be used to endorse or promote products derived from
//    this software without specific prior written permission.
//
// THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS "AS IS"
// AND ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO, THE
// IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE ARE
// DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT HOLDER OR CONTRIBUTORS BE LIABLE
// FOR ANY DIRECT, INDIRECT, INCIDENTAL, SPECIAL, EXEMPLARY, OR CONSEQUENTIAL
// DAMAGES (INCLUDING, BUT NOT LIMITED TO, PROCUREMENT OF SUBSTITUTE GOODS OR
// SERVICES; LOSS OF USE, DATA, OR PROFITS; OR BUSINESS INTERRUPTION) HOWEVER
// CAUSED AND ON ANY THEORY OF LIABILITY, WHETHER IN CONTRACT, STRICT LIABILITY,
// OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE) ARISING IN ANY WAY OUT OF THE USE
// OF THIS SOFTWARE, EVEN IF ADVISED OF THE POSSIBILITY OF SUCH DAMAGE.

use ndarray::{Array1, Array2, ArrayView1};

/// Represents a node in a regression tree.
///
/// Internal nodes send a row left when `row[feature] < threshold` and right
/// otherwise. Leaves hold the raw (unshrunk) output of the tree.
#[derive(Debug, Clone)]
enum TreeNode {
    Internal { feature: usize, threshold: f64, left: Box<TreeNode>, right: Box<TreeNode> },
    Leaf { weight: f64 },
}

/// A single fitted regression tree of the ensemble.
#[derive(Debug, Clone)]
pub struct RegressionTree {
    root: TreeNode,
}

impl RegressionTree {
    pub fn predict_row(&self, row: ArrayView1<f64>) -> f64 {
        let mut current = &self.root;
        loop {
            match current {
                TreeNode::Leaf { weight } => return *weight,
                TreeNode::Internal { feature, threshold, left, right } => {
                    current = if row[*feature] < *threshold { left } else { right };
                }
            }
        }
    }

    /// Depth of the deepest leaf; a lone leaf has depth zero.
    pub fn depth(&self) -> usize {
        fn walk(node: &TreeNode) -> usize {
            match node {
                TreeNode::Leaf { .. } => 0,
                TreeNode::Internal { left, right, .. } => 1 + walk(left).max(walk(right)),
            }
        }
        walk(&self.root)
    }

    pub fn n_leaves(&self) -> usize {
        fn walk(node: &TreeNode) -> usize {
            match node {
                TreeNode::Leaf { .. } => 1,
                TreeNode::Internal { left, right, .. } => walk(left) + walk(right),
            }
        }
        walk(&self.root)
    }
}

/// Structural and regularization parameters shared by every tree.
#[derive(Debug, Clone)]
pub struct TreeParams {
    pub max_depth: usize,
    /// L2 regularization on leaf weights (lambda).
    pub reg_lambda: f64,
    /// Minimum gain required to keep a split (gamma).
    pub gamma: f64,
    /// Minimum hessian sum in each child.
    pub min_child_weight: f64,
}

impl Default for TreeParams {
    fn default() -> Self {
        TreeParams { max_depth: 6, reg_lambda: 1.0, gamma: 0.0, min_child_weight: 1.0 }
    }
}

impl TreeParams {
    /// Split gain:
    ///
    /// ```text
    /// gain = 0.5 * [G_L²/(H_L + λ) + G_R²/(H_R + λ) - G_P²/(H_P + λ)] - γ
    /// ```
    #[inline]
    fn gain(&self, g_left: f64, h_left: f64, g_right: f64, h_right: f64) -> f64 {
        let score = |g: f64, h: f64| g * g / (h + self.reg_lambda);
        let (g_parent, h_parent) = (g_left + g_right, h_left + h_right);
        0.5 * (score(g_left, h_left) + score(g_right, h_right) - score(g_parent, h_parent))
            - self.gamma
    }

    #[inline]
    fn leaf_weight(&self, grad_sum: f64, hess_sum: f64) -> f64 {
        -grad_sum / (hess_sum + self.reg_lambda)
    }
}

/// A split chosen while growing a tree, kept for feature importance.
#[derive(Debug, Clone, Copy)]
pub struct SplitRecord {
    pub feature: usize,
    pub gain: f64,
}

#[derive(Debug, Clone, Copy)]
struct Split {
    feature: usize,
    threshold: f64,
    gain: f64,
}

/// Grows one tree on a subset of rows and features with exact greedy splits.
pub struct TreeBuilder<'a> {
    x: &'a Array2<f64>,
    grad: &'a Array1<f64>,
    hess: &'a Array1<f64>,
    features: &'a [usize],
    params: &'a TreeParams,
    splits: Vec<SplitRecord>,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(
        x: &'a Array2<f64>,
        grad: &'a Array1<f64>,
        hess: &'a Array1<f64>,
        features: &'a [usize],
        params: &'a TreeParams,
    ) -> Self {
        TreeBuilder { x, grad, hess, features, params, splits: Vec::new() }
    }

    pub fn build(mut self, rows: Vec<usize>) -> (RegressionTree, Vec<SplitRecord>) {
        let root = self.build_node(rows, 0);
        (RegressionTree { root }, self.splits)
    }

    fn build_node(&mut self, rows: Vec<usize>, depth: usize) -> TreeNode {
        let grad_sum: f64 = rows.iter().map(|&r| self.grad[r]).sum();
        let hess_sum: f64 = rows.iter().map(|&r| self.hess[r]).sum();
        let leaf = TreeNode::Leaf { weight: self.params.leaf_weight(grad_sum, hess_sum) };

        if depth >= self.params.max_depth || rows.len() < 2 {
            return leaf;
        }

        let Some(split) = self.find_best_split(&rows, grad_sum, hess_sum) else {
            return leaf;
        };

        let x = self.x;
        let (left_rows, right_rows): (Vec<usize>, Vec<usize>) =
            rows.into_iter().partition(|&r| x[[r, split.feature]] < split.threshold);
        self.splits.push(SplitRecord { feature: split.feature, gain: split.gain });

        let left = self.build_node(left_rows, depth + 1);
        let right = self.build_node(right_rows, depth + 1);
        TreeNode::Internal {
            feature: split.feature,
            threshold: split.threshold,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    fn find_best_split(&self, rows: &[usize], grad_sum: f64, hess_sum: f64) -> Option<Split> {
        let mut best: Option<Split> = None;
        let mut sorted = rows.to_vec();

        for &feature in self.features {
            let value_of = |r: usize| self.x[[r, feature]];
            sorted.sort_by(|&a, &b| value_of(a).total_cmp(&value_of(b)));

            let (mut g_left, mut h_left) = (0.0, 0.0);
            for i in 0..sorted.len() - 1 {
                let row = sorted[i];
                g_left += self.grad[row];
                h_left += self.hess[row];

                let value = value_of(row);
                let next = value_of(sorted[i + 1]);
                // Equal values cannot be separated by a threshold
                if next <= value {
                    continue;
                }

                let (g_right, h_right) = (grad_sum - g_left, hess_sum - h_left);
                if h_left < self.params.min_child_weight || h_right < self.params.min_child_weight
                {
                    continue;
                }

                let gain = self.params.gain(g_left, h_left, g_right, h_right);
                if gain > best.map_or(0.0, |b| b.gain) {
                    let mut threshold = value + (next - value) / 2.0;
                    if threshold <= value {
                        threshold = next;
                    }
                    best = Some(Split { feature, threshold, gain });
                }
            }
        }
        best
    }
}
