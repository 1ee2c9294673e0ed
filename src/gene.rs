//! Pattern genes and the individuals (strategies) built from them.
//!
//! A gene is a square template of cell constraints plus one constraint per
//! border saying whether that border must, may, or must not lie on the board
//! edge. Genes serialize with compact integer codes:
//!
//! | cell code | meaning                                        |
//! |-----------|------------------------------------------------|
//! | `-2`      | cell must be empty                             |
//! | `-1`      | anything                                       |
//! | `0`       | cell must be empty, and a move is proposed there |
//! | `k >= 1`  | cell holds a stone of relative player `k - 1`  |
//!
//! Edge codes are `1` (must touch the edge), `0` (either) and `-1` (must not),
//! listed top, right, bottom, left.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_EDGE_CHANCE, DEFAULT_GENES, DEFAULT_MAX_GENE_SIZE, DEFAULT_PLAYERS, MAX_STONE_PLAYERS,
    MIN_GENE_SIZE, UNOCCUPIED,
};
use crate::error::GeneError;

/// What a template cell requires of the board cell under it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum CellConstraint {
    /// The board cell must be empty.
    Unoccupied,
    /// Matches any board cell.
    Any,
    /// The board cell must be empty; on a match it gets a vote.
    Move,
    /// The board cell must hold a stone of this relative player (0 = own).
    Stone(u8),
}

impl CellConstraint {
    /// Whether a snapshot value satisfies this constraint.
    #[inline]
    pub fn matches(self, value: i32) -> bool {
        match self {
            CellConstraint::Unoccupied | CellConstraint::Move => value == UNOCCUPIED,
            CellConstraint::Any => true,
            CellConstraint::Stone(p) => value == i32::from(p),
        }
    }
}

impl TryFrom<i32> for CellConstraint {
    type Error = GeneError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            -2 => Ok(CellConstraint::Unoccupied),
            -1 => Ok(CellConstraint::Any),
            0 => Ok(CellConstraint::Move),
            k if k > 0 => u8::try_from(k - 1)
                .map(CellConstraint::Stone)
                .map_err(|_| GeneError::InvalidCellCode(code)),
            _ => Err(GeneError::InvalidCellCode(code)),
        }
    }
}

impl From<CellConstraint> for i32 {
    fn from(cell: CellConstraint) -> i32 {
        match cell {
            CellConstraint::Unoccupied => -2,
            CellConstraint::Any => -1,
            CellConstraint::Move => 0,
            CellConstraint::Stone(p) => i32::from(p) + 1,
        }
    }
}

/// What a template border requires of the board edge.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i8", into = "i8")]
pub enum EdgeConstraint {
    Require,
    Either,
    Forbid,
}

impl EdgeConstraint {
    pub const ALL: [EdgeConstraint; 3] = [
        EdgeConstraint::Require,
        EdgeConstraint::Either,
        EdgeConstraint::Forbid,
    ];

    /// Whether a border that does (or does not) lie on the board edge is allowed.
    #[inline]
    pub fn allows(self, on_edge: bool) -> bool {
        match self {
            EdgeConstraint::Require => on_edge,
            EdgeConstraint::Either => true,
            EdgeConstraint::Forbid => !on_edge,
        }
    }
}

impl TryFrom<i8> for EdgeConstraint {
    type Error = GeneError;

    fn try_from(code: i8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(EdgeConstraint::Require),
            0 => Ok(EdgeConstraint::Either),
            -1 => Ok(EdgeConstraint::Forbid),
            _ => Err(GeneError::InvalidEdgeCode(code)),
        }
    }
}

impl From<EdgeConstraint> for i8 {
    fn from(edge: EdgeConstraint) -> i8 {
        match edge {
            EdgeConstraint::Require => 1,
            EdgeConstraint::Either => 0,
            EdgeConstraint::Forbid => -1,
        }
    }
}

/// A square pattern template. Immutable once built.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawGene", into = "RawGene")]
pub struct Gene {
    size: usize,
    cells: Vec<CellConstraint>,
    edges: [EdgeConstraint; 4],
}

#[derive(Clone, Serialize, Deserialize)]
struct RawGene {
    size: usize,
    cells: Vec<CellConstraint>,
    edges: [EdgeConstraint; 4],
}

impl TryFrom<RawGene> for Gene {
    type Error = GeneError;

    fn try_from(raw: RawGene) -> Result<Self, Self::Error> {
        Gene::new(raw.size, raw.cells, raw.edges)
    }
}

impl From<Gene> for RawGene {
    fn from(gene: Gene) -> Self {
        RawGene {
            size: gene.size,
            cells: gene.cells,
            edges: gene.edges,
        }
    }
}

fn cell_count(size: usize) -> Result<usize, GeneError> {
    size.checked_mul(size).ok_or(GeneError::TooLarge(size))
}

impl Gene {
    /// Build a gene from row-major cells and top/right/bottom/left edges.
    pub fn new(
        size: usize,
        cells: Vec<CellConstraint>,
        edges: [EdgeConstraint; 4],
    ) -> Result<Self, GeneError> {
        if size < MIN_GENE_SIZE {
            return Err(GeneError::TooSmall {
                size,
                min: MIN_GENE_SIZE,
            });
        }
        let expected = cell_count(size)?;
        if cells.len() != expected {
            return Err(GeneError::CellCount {
                size,
                expected,
                found: cells.len(),
            });
        }
        Ok(Self { size, cells, edges })
    }

    /// Build a gene from integer codes (see the module docs).
    pub fn from_codes(size: usize, cells: &[i32], edges: [i8; 4]) -> Result<Self, GeneError> {
        let cells = cells
            .iter()
            .map(|&c| CellConstraint::try_from(c))
            .collect::<Result<Vec<_>, _>>()?;
        let mut parsed = [EdgeConstraint::Either; 4];
        for (slot, code) in parsed.iter_mut().zip(edges) {
            *slot = EdgeConstraint::try_from(code)?;
        }
        Self::new(size, cells, parsed)
    }

    /// A random gene.
    ///
    /// Cells are uniform over every constraint, including a stone of each of
    /// the `n_players` relative players. Each edge is constrained with
    /// probability `edge_chance`, uniformly to one of the three options.
    pub fn random(
        size: usize,
        n_players: usize,
        edge_chance: f64,
        rng: &mut fastrand::Rng,
    ) -> Result<Self, GeneError> {
        if n_players > MAX_STONE_PLAYERS {
            return Err(GeneError::TooManyPlayers {
                n_players,
                max: MAX_STONE_PLAYERS,
            });
        }
        let cells = (0..cell_count(size)?)
            .map(|_| match rng.usize(..n_players + 3) {
                0 => CellConstraint::Unoccupied,
                1 => CellConstraint::Any,
                2 => CellConstraint::Move,
                k => CellConstraint::Stone((k - 3) as u8),
            })
            .collect();
        let edges = std::array::from_fn(|_| {
            if rng.f64() < edge_chance {
                EdgeConstraint::ALL[rng.usize(..EdgeConstraint::ALL.len())]
            } else {
                EdgeConstraint::Either
            }
        });
        Self::new(size, cells, edges)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Row-major cell constraints.
    pub fn cells(&self) -> &[CellConstraint] {
        &self.cells
    }

    #[inline]
    pub fn cell(&self, r: usize, c: usize) -> CellConstraint {
        self.cells[r * self.size + c]
    }

    /// Edge constraints: top, right, bottom, left.
    pub fn edges(&self) -> [EdgeConstraint; 4] {
        self.edges
    }

    /// The gene turned 90 degrees clockwise, cells and edges together.
    pub fn rotated(&self) -> Gene {
        let n = self.size;
        let cells = (0..n * n)
            .map(|i| {
                let (r, c) = (i / n, i % n);
                self.cell(n - 1 - c, r)
            })
            .collect();
        let edges = std::array::from_fn(|i| self.edges[(i + 3) % 4]);
        Gene {
            size: n,
            cells,
            edges,
        }
    }

    /// The distinct rotations of this gene, starting with the gene itself.
    ///
    /// A template that looks the same after turning is listed once, so it
    /// votes once per placement.
    pub fn distinct_rotations(&self) -> Vec<Gene> {
        let mut rotations: Vec<Gene> = Vec::with_capacity(4);
        let mut current = self.clone();
        for _ in 0..4 {
            let next = current.rotated();
            if !rotations.contains(&current) {
                rotations.push(current);
            }
            current = next;
        }
        rotations
    }
}

impl fmt::Display for Gene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let edges: Vec<i8> = self.edges.iter().map(|&e| e.into()).collect();
        let cells: Vec<i32> = self.cells.iter().map(|&c| c.into()).collect();
        write!(f, "size={}, edges={:?}, cells={:?}", self.size, edges, cells)
    }
}

/// Parameters for generating random individuals.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeneParams {
    pub n_genes: usize,
    pub max_gene_size: usize,
    pub n_players: usize,
    pub edge_chance: f64,
}

impl Default for GeneParams {
    fn default() -> Self {
        Self {
            n_genes: DEFAULT_GENES,
            max_gene_size: DEFAULT_MAX_GENE_SIZE,
            n_players: DEFAULT_PLAYERS,
            edge_chance: DEFAULT_EDGE_CHANCE,
        }
    }
}

/// A strategy: an ordered sequence of genes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Individual {
    genes: Vec<Gene>,
}

impl Individual {
    pub fn new(genes: Vec<Gene>) -> Self {
        Self { genes }
    }

    /// A random individual with gene sizes uniform in `2..=max_gene_size`.
    pub fn random(params: &GeneParams, rng: &mut fastrand::Rng) -> Result<Self, GeneError> {
        if params.max_gene_size < MIN_GENE_SIZE {
            return Err(GeneError::TooSmall {
                size: params.max_gene_size,
                min: MIN_GENE_SIZE,
            });
        }
        let genes = (0..params.n_genes)
            .map(|_| {
                let size = rng.usize(MIN_GENE_SIZE..=params.max_gene_size);
                Gene::random(size, params.n_players, params.edge_chance, rng)
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { genes })
    }

    pub fn genes(&self) -> &[Gene] {
        &self.genes
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    pub fn max_gene_size(&self) -> usize {
        self.genes.iter().map(Gene::size).max().unwrap_or(0)
    }
}

impl fmt::Display for Individual {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "n_genes={}, max_gene_size={}",
            self.len(),
            self.max_gene_size()
        )?;
        for gene in &self.genes {
            writeln!(f, "{gene}")?;
        }
        Ok(())
    }
}
