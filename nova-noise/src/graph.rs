//! Arena holding a module graph and evaluating it.
//!
//! Modules are added to a [`NoiseGraph`] and addressed by [`ModuleId`]
//! handles. Each module owns a fixed number of source slots that hold handles
//! to other modules, so a module may feed any number of parents. Evaluation
//! pulls recursively from the root through every wired source.
//!
//! # Concurrency
//!
//! Evaluation takes `&self` and never mutates, so one graph can be sampled
//! from many threads at once. Rewiring or changing parameters needs
//! `&mut self`, which the borrow checker keeps apart from any evaluation.

use std::fmt::{self, Display};
use std::mem;

use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::error::ModuleError;
use crate::module::{Module, ModuleImpl, ModuleKind};
use crate::point::Point3D;

/// Handle to a module inside a [`NoiseGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleId(usize);

impl ModuleId {
    /// Position of the module in its graph, in insertion order.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone)]
struct Node {
    module: Module,
    sources: SmallVec<[Option<ModuleId>; 4]>,
}

/// Owns modules and the wiring between them.
#[derive(Debug, Clone, Default)]
pub struct NoiseGraph {
    nodes: Vec<Node>,
}

impl NoiseGraph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of modules in the graph.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if no modules have been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns true if `module` was issued by this graph.
    #[must_use]
    pub fn contains(&self, module: ModuleId) -> bool {
        module.0 < self.nodes.len()
    }

    /// Adds a module with all of its source slots empty.
    pub fn add(&mut self, module: impl Into<Module>) -> ModuleId {
        let module = module.into();
        let id = ModuleId(self.nodes.len());
        trace!(%id, kind = module.kind_name(), "adding module");
        let sources = SmallVec::from_elem(None, module.arity());
        self.nodes.push(Node { module, sources });
        id
    }

    /// Adds a module and wires `sources` into its slots, starting at slot 0.
    ///
    /// Nothing is added if any source is unknown or there are more sources
    /// than the module has slots.
    pub fn add_with_sources(
        &mut self,
        module: impl Into<Module>,
        sources: &[ModuleId],
    ) -> Result<ModuleId, ModuleError> {
        let module = module.into();
        if let Some(&unknown) = sources.iter().find(|&&source| !self.contains(source)) {
            return Err(ModuleError::UnknownModule(unknown));
        }
        let arity = module.arity();
        if sources.len() > arity {
            return Err(ModuleError::InvalidIndex {
                module: ModuleId(self.nodes.len()),
                index: arity,
                arity,
            });
        }

        let id = self.add(module);
        let node = &mut self.nodes[id.0];
        for (slot, &source) in node.sources.iter_mut().zip(sources) {
            *slot = Some(source);
        }
        Ok(id)
    }

    /// Wires `source` into slot `index` of `module`, replacing what was there.
    ///
    /// Fails with [`ModuleError::GraphCycle`] if `module` already feeds
    /// `source`, directly or through other modules.
    pub fn set_source(
        &mut self,
        module: ModuleId,
        index: usize,
        source: ModuleId,
    ) -> Result<(), ModuleError> {
        if !self.contains(source) {
            return Err(ModuleError::UnknownModule(source));
        }
        self.slot_mut(module, index)?;
        if self.reaches(source, module) {
            debug!(%module, %source, "rejected wiring that closes a cycle");
            return Err(ModuleError::GraphCycle { module, input: source });
        }
        let slot = self.slot_mut(module, index)?;
        *slot = Some(source);
        trace!(%module, index, %source, "wired source");
        Ok(())
    }

    /// Empties slot `index` of `module`, returning the source it held.
    pub fn clear_source(
        &mut self,
        module: ModuleId,
        index: usize,
    ) -> Result<Option<ModuleId>, ModuleError> {
        let previous = self.slot_mut(module, index)?.take();
        trace!(%module, index, "cleared source");
        Ok(previous)
    }

    /// The source wired into slot `index` of `module`.
    pub fn source(&self, module: ModuleId, index: usize) -> Result<ModuleId, ModuleError> {
        let node = self.node(module)?;
        let arity = node.sources.len();
        node.sources
            .get(index)
            .ok_or(ModuleError::InvalidIndex {
                module,
                index,
                arity,
            })?
            .ok_or(ModuleError::MissingSource {
                module,
                slot: index,
            })
    }

    /// Number of source slots `module` has.
    pub fn arity(&self, module: ModuleId) -> Result<usize, ModuleError> {
        Ok(self.node(module)?.sources.len())
    }

    /// Kind name of `module`.
    pub fn kind_name(&self, module: ModuleId) -> Result<&'static str, ModuleError> {
        Ok(self.node(module)?.module.kind_name())
    }

    /// Borrows a module.
    pub fn module(&self, module: ModuleId) -> Result<&Module, ModuleError> {
        Ok(&self.node(module)?.module)
    }

    /// Mutably borrows a module, e.g. to change its parameters.
    pub fn module_mut(&mut self, module: ModuleId) -> Result<&mut Module, ModuleError> {
        self.nodes
            .get_mut(module.0)
            .map(|node| &mut node.module)
            .ok_or(ModuleError::UnknownModule(module))
    }

    /// Borrows a module as its concrete kind.
    pub fn get<T: ModuleKind>(&self, module: ModuleId) -> Result<&T, ModuleError> {
        let stored = self.module(module)?;
        T::from_module(stored).ok_or(ModuleError::WrongKind {
            module,
            expected: T::NAME,
            found: stored.kind_name(),
        })
    }

    /// Mutably borrows a module as its concrete kind.
    pub fn get_mut<T: ModuleKind>(&mut self, module: ModuleId) -> Result<&mut T, ModuleError> {
        let stored = self.module_mut(module)?;
        let found = stored.kind_name();
        T::from_module_mut(stored).ok_or(ModuleError::WrongKind {
            module,
            expected: T::NAME,
            found,
        })
    }

    /// Evaluates `module` at `(x, y, z)`.
    pub fn evaluate(&self, module: ModuleId, x: f64, y: f64, z: f64) -> Result<f64, ModuleError> {
        self.evaluate_point(module, Point3D::new(x, y, z))
    }

    /// Evaluates `module` at `point`.
    pub fn evaluate_point(
        &self,
        module: ModuleId,
        point: impl Into<Point3D>,
    ) -> Result<f64, ModuleError> {
        self.evaluate_node(module, point.into())
    }

    /// Evaluates `module` on the unit sphere at a latitude/longitude in degrees.
    pub fn evaluate_sphere(&self, module: ModuleId, lat: f64, lon: f64) -> Result<f64, ModuleError> {
        self.evaluate_point(module, Point3D::from_lat_lon(lat, lon))
    }

    /// A lightweight handle for repeatedly evaluating one module.
    pub fn sampler(&self, module: ModuleId) -> Result<Sampler<'_>, ModuleError> {
        self.node(module)?;
        Ok(Sampler {
            graph: self,
            module,
        })
    }

    fn evaluate_node(&self, module: ModuleId, point: Point3D) -> Result<f64, ModuleError> {
        let node = self.node(module)?;
        if let Some(slot) = node.sources.iter().position(Option::is_none) {
            return Err(ModuleError::MissingSource { module, slot });
        }
        let sources = Sources {
            graph: self,
            module,
            slots: node.sources.as_slice(),
        };
        node.module.evaluate(&sources, point)
    }

    /// Whether `target` is `from` or one of its transitive sources.
    fn reaches(&self, from: ModuleId, target: ModuleId) -> bool {
        let mut visited = vec![false; self.nodes.len()];
        let mut stack = vec![from];
        while let Some(id) = stack.pop() {
            if id == target {
                return true;
            }
            let Some(node) = self.nodes.get(id.0) else {
                continue;
            };
            if mem::replace(&mut visited[id.0], true) {
                continue;
            }
            stack.extend(node.sources.iter().flatten().copied());
        }
        false
    }

    fn node(&self, module: ModuleId) -> Result<&Node, ModuleError> {
        self.nodes
            .get(module.0)
            .ok_or(ModuleError::UnknownModule(module))
    }

    fn slot_mut(
        &mut self,
        module: ModuleId,
        index: usize,
    ) -> Result<&mut Option<ModuleId>, ModuleError> {
        let node = self
            .nodes
            .get_mut(module.0)
            .ok_or(ModuleError::UnknownModule(module))?;
        let arity = node.sources.len();
        node.sources.get_mut(index).ok_or(ModuleError::InvalidIndex {
            module,
            index,
            arity,
        })
    }
}

/// The wired sources of the module currently being evaluated.
pub struct Sources<'a> {
    graph: &'a NoiseGraph,
    module: ModuleId,
    slots: &'a [Option<ModuleId>],
}

impl Sources<'_> {
    /// The module these sources belong to.
    #[must_use]
    pub const fn module(&self) -> ModuleId {
        self.module
    }

    /// Evaluates the source in `slot` at `point`.
    pub fn evaluate(&self, slot: usize, point: Point3D) -> Result<f64, ModuleError> {
        let source = self
            .slots
            .get(slot)
            .ok_or(ModuleError::InvalidIndex {
                module: self.module,
                index: slot,
                arity: self.slots.len(),
            })?
            .ok_or(ModuleError::MissingSource {
                module: self.module,
                slot,
            })?;
        self.graph.evaluate_node(source, point)
    }
}

/// A module bound to its graph, for call sites that sample one module often.
#[derive(Debug, Clone, Copy)]
pub struct Sampler<'a> {
    graph: &'a NoiseGraph,
    module: ModuleId,
}

impl Sampler<'_> {
    /// The sampled module.
    #[must_use]
    pub const fn module(&self) -> ModuleId {
        self.module
    }

    /// Evaluates the module at `(x, y, z)`.
    pub fn evaluate(&self, x: f64, y: f64, z: f64) -> Result<f64, ModuleError> {
        self.graph.evaluate(self.module, x, y, z)
    }

    /// Evaluates the module at `point`.
    pub fn evaluate_point(&self, point: impl Into<Point3D>) -> Result<f64, ModuleError> {
        self.graph.evaluate_point(self.module, point)
    }
}
