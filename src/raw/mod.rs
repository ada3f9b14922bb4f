mod arena;
mod handle;
mod node;
mod raw_osrbtree_map;
mod size;
mod validate;

pub(crate) use raw_osrbtree_map::RawOSRBTreeMap;
