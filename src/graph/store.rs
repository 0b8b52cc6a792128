use crate::graph::NodeId;
use crate::storage::{KeyValueStore, MemoryStore};
use crate::{GraphError, GraphResult};
use parking_lot::Mutex;
use std::sync::Arc;

/// Smallest capacity the graph grows to
pub const MIN_CAPACITY: usize = 16;

const WORD_BITS: usize = u64::BITS as usize;

/// Directed link graph over canonical URLs
///
/// Node ids are handed out sequentially and never move. All per-node arrays
/// are reserved together against an explicit capacity that doubles when full.
///
/// A node is dangling exactly while its out-degree is zero.
#[derive(Debug)]
pub struct LinkGraph {
    index: MemoryStore<NodeId>,
    urls: Vec<String>,
    out_degree: Vec<u32>,
    dangling: Vec<u64>,
    inbound: Vec<Vec<NodeId>>,
    capacity: usize,
    edges: usize,
}

impl LinkGraph {
    /// Creates an empty graph with room for `capacity` nodes (at least [`MIN_CAPACITY`])
    pub fn with_capacity(capacity: usize) -> GraphResult<Self> {
        let capacity = capacity.max(MIN_CAPACITY);
        let mut graph = Self {
            index: MemoryStore::with_capacity(capacity),
            urls: Vec::new(),
            out_degree: Vec::new(),
            dangling: Vec::new(),
            inbound: Vec::new(),
            capacity: 0,
            edges: 0,
        };
        graph.grow(capacity)?;
        Ok(graph)
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of recorded links, duplicates included
    pub fn edge_count(&self) -> usize {
        self.edges
    }

    pub fn contains(&self, url: &str) -> bool {
        self.index.contains(url)
    }

    pub fn id_of(&self, url: &str) -> Option<NodeId> {
        self.index.get(url).copied()
    }

    pub fn url(&self, id: NodeId) -> Option<&str> {
        self.urls.get(id).map(String::as_str)
    }

    pub fn out_degree(&self, id: NodeId) -> u32 {
        self.out_degree.get(id).copied().unwrap_or(0)
    }

    pub fn is_dangling(&self, id: NodeId) -> bool {
        id < self.len() && self.dangling[id / WORD_BITS] & (1 << (id % WORD_BITS)) != 0
    }

    /// Ids of the nodes linking to `id`, in the order the links were recorded
    pub fn inbound(&self, id: NodeId) -> &[NodeId] {
        self.inbound.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Registers `url` and returns its id; an already known URL keeps its id
    pub fn add_url(&mut self, url: &str) -> GraphResult<NodeId> {
        if let Some(id) = self.id_of(url) {
            return Ok(id);
        }

        if self.len() == self.capacity {
            let target = self
                .capacity
                .checked_mul(2)
                .ok_or(GraphError::Grow {
                    capacity: usize::MAX,
                })?
                .max(MIN_CAPACITY);
            self.grow(target)?;
        }

        let id = self.urls.len();
        self.urls.push(url.to_string());
        self.out_degree.push(0);
        self.inbound.push(Vec::new());
        if id % WORD_BITS == 0 {
            self.dangling.push(0);
        }
        self.dangling[id / WORD_BITS] |= 1 << (id % WORD_BITS);
        self.index.put(url.to_string(), id);

        Ok(id)
    }

    /// Records a link from `src` to `dest`; both must already be registered
    pub fn add_link(&mut self, dest: &str, src: &str) -> GraphResult<()> {
        let dest_id = self
            .id_of(dest)
            .ok_or_else(|| GraphError::UnknownUrl(dest.to_string()))?;
        let src_id = self
            .id_of(src)
            .ok_or_else(|| GraphError::UnknownUrl(src.to_string()))?;
        self.link_ids(dest_id, src_id);
        Ok(())
    }

    fn link_ids(&mut self, dest: NodeId, src: NodeId) {
        self.inbound[dest].push(src);
        self.out_degree[src] += 1;
        self.dangling[src / WORD_BITS] &= !(1 << (src % WORD_BITS));
        self.edges += 1;
    }

    /// Raises the capacity of every per-node array to `new_capacity`
    ///
    /// Existing ids and adjacency are untouched. Shrinking is a no-op.
    pub fn grow(&mut self, new_capacity: usize) -> GraphResult<()> {
        if new_capacity <= self.capacity {
            return Ok(());
        }

        let extra = new_capacity - self.len();
        let words = new_capacity.div_ceil(WORD_BITS);
        let fail = |_| GraphError::Grow {
            capacity: new_capacity,
        };

        self.urls.try_reserve_exact(extra).map_err(fail)?;
        self.out_degree.try_reserve_exact(extra).map_err(fail)?;
        self.inbound.try_reserve_exact(extra).map_err(fail)?;
        self.dangling
            .try_reserve_exact(words.saturating_sub(self.dangling.len()))
            .map_err(fail)?;

        tracing::debug!("Link graph capacity {} -> {}", self.capacity, new_capacity);
        self.capacity = new_capacity;
        Ok(())
    }

    /// Iterates over `(id, url)` pairs in id order
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &str)> {
        self.urls.iter().map(String::as_str).enumerate()
    }
}

/// Outcome of [`SharedGraph::record_link`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Discovery {
    /// The destination was registered by this call
    New(NodeId),
    /// The destination was already in the graph
    Known(NodeId),
}

impl Discovery {
    pub fn id(self) -> NodeId {
        match self {
            Self::New(id) | Self::Known(id) => id,
        }
    }
}

/// A [`LinkGraph`] shared between crawl tasks
#[derive(Debug, Clone)]
pub struct SharedGraph {
    inner: Arc<Mutex<LinkGraph>>,
}

impl SharedGraph {
    pub fn new(graph: LinkGraph) -> Self {
        Self {
            inner: Arc::new(Mutex::new(graph)),
        }
    }

    /// Registers `url` as a node
    pub fn add_url(&self, url: &str) -> GraphResult<NodeId> {
        self.inner.lock().add_url(url)
    }

    /// Records `src` → `dest`, registering `dest` first if it is new
    ///
    /// Lookup, registration and the edge happen under one lock, so two tasks
    /// discovering the same URL cannot both see it as new.
    pub fn record_link(&self, dest: &str, src: &str) -> GraphResult<Discovery> {
        let mut graph = self.inner.lock();
        let src_id = graph
            .id_of(src)
            .ok_or_else(|| GraphError::UnknownUrl(src.to_string()))?;

        let discovery = match graph.id_of(dest) {
            Some(id) => Discovery::Known(id),
            None => Discovery::New(graph.add_url(dest)?),
        };
        graph.link_ids(discovery.id(), src_id);
        Ok(discovery)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Runs `f` with the graph locked
    pub fn with<R>(&self, f: impl FnOnce(&LinkGraph) -> R) -> R {
        f(&self.inner.lock())
    }

    /// Takes the graph back once every other handle is gone
    pub fn into_inner(self) -> Result<LinkGraph, Self> {
        Arc::try_unwrap(self.inner)
            .map(Mutex::into_inner)
            .map_err(|inner| Self { inner })
    }
}
