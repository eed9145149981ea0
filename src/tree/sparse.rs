//! Core content-addressed sparse Merkle tree implementation

use std::{marker::PhantomData, sync::Arc};

use log::{debug, warn};

use crate::{
    config::validate_height,
    db::Db,
    hash::{bit_at, leaf_hash, left_slot_key, right_slot_key, Hasher, Path, MAX_DEPTH},
    Branch, CompressedProof, Proof, Slot, TreeConfig, TreeError, TreeSnapshot,
};

use super::{check_path, walk_up, EmptyTree};

/// Fixed-height sparse merkle tree whose nodes are addressed by content.
/// * `HASH_SIZE` - size of the hash digest in bytes.
/// * `H` - Hasher that will be used to hash nodes.
/// * `D` - Key value store for the children of every materialized parent.
pub struct SparseMerkleTree<const HASH_SIZE: usize, H: Hasher<HASH_SIZE> + Clone, D: Db<HASH_SIZE>>
{
    db: D,
    root: [u8; HASH_SIZE],
    height: usize,
    zero_hashes: Arc<[[u8; HASH_SIZE]]>,
    _phantom: PhantomData<H>,
}

impl<const HASH_SIZE: usize, H: Hasher<HASH_SIZE> + Clone, D: Db<HASH_SIZE>>
    SparseMerkleTree<HASH_SIZE, H, D>
{
    /// Creates an empty tree of height [`MAX_DEPTH`]. Nothing is written to `db`.
    pub fn new(db: D) -> Self {
        let zero_hashes = EmptyTree::<HASH_SIZE, H>::zero_hashes();
        Self {
            db,
            root: zero_hashes[MAX_DEPTH],
            height: MAX_DEPTH,
            zero_hashes,
            _phantom: PhantomData,
        }
    }

    /// Creates an empty tree with the configured height.
    pub fn with_config(db: D, config: TreeConfig) -> Result<Self, TreeError<D::DbError>> {
        config.validate::<D::DbError>()?;
        let zero_hashes = EmptyTree::<HASH_SIZE, H>::zero_hashes();
        Ok(Self {
            db,
            root: zero_hashes[config.height],
            height: config.height,
            zero_hashes,
            _phantom: PhantomData,
        })
    }

    /// Rehydrates a tree from a trusted snapshot over a store that already holds its nodes.
    ///
    /// Only the height is checked. If `db` does not contain the nodes reachable from
    /// `snapshot.root`, descents will see zero subtrees where real nodes should be.
    pub fn from_snapshot(
        db: D,
        snapshot: TreeSnapshot<HASH_SIZE>,
    ) -> Result<Self, TreeError<D::DbError>> {
        validate_height::<D::DbError>(snapshot.height)?;
        debug!(
            "Rehydrating tree at root {} (height {})",
            hex::encode(snapshot.root),
            snapshot.height
        );
        Ok(Self {
            db,
            root: snapshot.root,
            height: snapshot.height,
            zero_hashes: EmptyTree::<HASH_SIZE, H>::zero_hashes(),
            _phantom: PhantomData,
        })
    }

    pub fn db(&self) -> &D {
        &self.db
    }

    /// Consumes the tree and gives back its store.
    pub fn into_db(self) -> D {
        self.db
    }

    /// Root hash of the tree.
    pub fn root(&self) -> [u8; HASH_SIZE] {
        self.root
    }

    /// Number of levels between a leaf and the root.
    pub fn height(&self) -> usize {
        self.height
    }

    pub fn snapshot(&self) -> TreeSnapshot<HASH_SIZE> {
        TreeSnapshot::new(self.root, self.height)
    }

    /// Hash of an empty subtree of the given depth (0 is an empty leaf), or `None`
    /// above [`MAX_DEPTH`].
    pub fn zero_root(&self, depth: usize) -> Option<[u8; HASH_SIZE]> {
        self.zero_hashes.get(depth).copied()
    }

    /// Writes both children of `parent`, under the keys derived from `parent`.
    pub fn store_node(
        &mut self,
        parent: &[u8; HASH_SIZE],
        left: [u8; HASH_SIZE],
        right: [u8; HASH_SIZE],
    ) -> Result<(), TreeError<D::DbError>> {
        self.db.insert(left_slot_key::<HASH_SIZE, H>(parent), left)?;
        self.db.insert(right_slot_key::<HASH_SIZE, H>(parent), right)
    }

    /// Reads both children of `parent`. Slots that were never written come back as
    /// [`Slot::ImplicitZero`].
    pub fn get_children(
        &self,
        parent: &[u8; HASH_SIZE],
    ) -> Result<(Slot<HASH_SIZE>, Slot<HASH_SIZE>), TreeError<D::DbError>> {
        let left = self.db.get(&left_slot_key::<HASH_SIZE, H>(parent))?;
        let right = self.db.get(&right_slot_key::<HASH_SIZE, H>(parent))?;
        Ok((left.into(), right.into()))
    }

    /// Walk down the tree from the root node to the leaf at `path` and return the leaf.
    /// * `for_each` - Closure that is executed at each step of the traversal of the tree.
    ///     * `level: usize` - level of the children just read (0 is the leaf level)
    ///     * `next: &[u8; HASH_SIZE]` - child on the path
    ///     * `sibling: [u8; HASH_SIZE]` - the other child
    fn walk_down(
        &self,
        path: Path,
        mut for_each: impl FnMut(usize, &[u8; HASH_SIZE], [u8; HASH_SIZE]),
    ) -> Result<[u8; HASH_SIZE], TreeError<D::DbError>> {
        check_path::<D::DbError>(path, self.height)?;
        let mut current = self.root;
        for level in (0..self.height).rev() {
            let (left, right) = self.get_children(&current)?;
            let zero = &self.zero_hashes[level];
            let (left, right) = (left.resolve(zero), right.resolve(zero));
            let (next, sibling) = if bit_at(path, level) == 0 {
                (left, right)
            } else {
                (right, left)
            };
            for_each(level, &next, sibling);
            current = next;
        }
        Ok(current)
    }

    /// Siblings of the leaf at `path`, ordered from the leaf level up to the root level.
    pub fn get_siblings(&self, path: Path) -> Result<Vec<[u8; HASH_SIZE]>, TreeError<D::DbError>> {
        let mut siblings = vec![[0; HASH_SIZE]; self.height];
        self.walk_down(path, |level, _next, sibling| {
            siblings[level] = sibling;
        })?;
        Ok(siblings)
    }

    /// Leaf digest currently stored at `path`.
    pub fn get_leaf(&self, path: Path) -> Result<[u8; HASH_SIZE], TreeError<D::DbError>> {
        self.walk_down(path, |_, _, _| {})
    }

    pub fn merkle_proof(&self, path: Path) -> Result<Proof<HASH_SIZE>, TreeError<D::DbError>> {
        Ok(Proof::new(self.get_siblings(path)?))
    }

    /// Proof for `path` with its zero-subtree siblings elided.
    pub fn compressed_proof(
        &self,
        path: Path,
    ) -> Result<CompressedProof<HASH_SIZE>, TreeError<D::DbError>> {
        Ok(self.merkle_proof(path)?.compress_with(&self.zero_hashes))
    }

    /// Expands a compressed proof taken from a tree of the same height.
    pub fn decompress_proof(
        &self,
        proof: &CompressedProof<HASH_SIZE>,
    ) -> Result<Proof<HASH_SIZE>, TreeError<D::DbError>> {
        if proof.bits().len() != self.height {
            return Err(TreeError::InvalidSiblingCount {
                expected: self.height,
                got: proof.bits().len(),
            });
        }
        proof.decompress_with(&self.zero_hashes)
    }

    /// Hashes `data` and writes it as the leaf at `path`.
    pub fn update(&mut self, data: &[u8], path: Path) -> Result<(), TreeError<D::DbError>> {
        self.update_leaf(leaf_hash::<HASH_SIZE, H>(data), path)
    }

    /// Writes `leaf` at `path`, using the siblings currently in the tree.
    pub fn update_leaf(
        &mut self,
        leaf: [u8; HASH_SIZE],
        path: Path,
    ) -> Result<(), TreeError<D::DbError>> {
        let siblings = self.get_siblings(path)?;
        self.store_leaf(leaf, path, &siblings)
    }

    /// Hashes `data` and writes it as the leaf at `path` with caller supplied siblings.
    pub fn store(
        &mut self,
        data: &[u8],
        path: Path,
        siblings: &[[u8; HASH_SIZE]],
    ) -> Result<(), TreeError<D::DbError>> {
        self.store_leaf(leaf_hash::<HASH_SIZE, H>(data), path, siblings)
    }

    /// Recomputes every ancestor of `leaf` from `siblings`, persists them and replaces
    /// the root. The siblings are trusted: the new root is whatever they produce.
    pub fn store_leaf(
        &mut self,
        leaf: [u8; HASH_SIZE],
        path: Path,
        siblings: &[[u8; HASH_SIZE]],
    ) -> Result<(), TreeError<D::DbError>> {
        let (root, branches) = self.simulate(leaf, path, siblings)?;
        self.commit(&branches, root)?;
        debug!(
            "Stored leaf {} at path {}, new root {}",
            hex::encode(leaf),
            path,
            hex::encode(root)
        );
        Ok(())
    }

    /// Hashes `data` and checks that `(data, path, siblings)` is a proof against the
    /// current root. See [`Self::verify_and_store_leaf`].
    pub fn verify_and_store(
        &mut self,
        data: &[u8],
        path: Path,
        siblings: &[[u8; HASH_SIZE]],
    ) -> Result<(), TreeError<D::DbError>> {
        self.verify_and_store_leaf(leaf_hash::<HASH_SIZE, H>(data), path, siblings)
    }

    /// Checks that `(leaf, path, siblings)` recomputes the current root, then stores the
    /// path nodes. On mismatch nothing is written and the root is unchanged.
    pub fn verify_and_store_leaf(
        &mut self,
        leaf: [u8; HASH_SIZE],
        path: Path,
        siblings: &[[u8; HASH_SIZE]],
    ) -> Result<(), TreeError<D::DbError>> {
        let expected = self.root;
        let (computed, branches) = self.simulate(leaf, path, siblings)?;
        if computed != expected {
            warn!(
                "Rejected proof for path {}: computed root {} does not match {}",
                path,
                hex::encode(computed),
                hex::encode(expected)
            );
            return Err(TreeError::InvalidMerkleProof {
                expected: expected.to_vec(),
                computed: computed.to_vec(),
            });
        }
        self.commit(&branches, computed)
    }

    /// Recomputes the root for `leaf` without touching the store.
    fn simulate(
        &self,
        leaf: [u8; HASH_SIZE],
        path: Path,
        siblings: &[[u8; HASH_SIZE]],
    ) -> Result<([u8; HASH_SIZE], Vec<Branch<HASH_SIZE>>), TreeError<D::DbError>> {
        if siblings.len() != self.height {
            return Err(TreeError::InvalidSiblingCount {
                expected: self.height,
                got: siblings.len(),
            });
        }
        let mut branches = Vec::with_capacity(self.height);
        let root = walk_up::<HASH_SIZE, H, D::DbError>(path, leaf, siblings, |_, parent| {
            branches.push(*parent);
        })?;
        Ok((root, branches))
    }

    fn commit(
        &mut self,
        branches: &[Branch<HASH_SIZE>],
        root: [u8; HASH_SIZE],
    ) -> Result<(), TreeError<D::DbError>> {
        for branch in branches {
            self.store_node(&branch.hash(), branch.left(), branch.right())?;
        }
        self.root = root;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::SparseMerkleTree;
    use crate::{
        leaf_hash, parent_hash, EmptyTree, MemoryDb, Slot, TreeConfig, TreeError, TreeSnapshot,
        MAX_DEPTH,
    };
    use sha2::Sha256;
    use sha3::Keccak256;

    type Tree = SparseMerkleTree<32, Sha256, MemoryDb<32>>;

    fn tree(height: usize) -> Tree {
        Tree::with_config(MemoryDb::default(), TreeConfig::with_height(height)).unwrap()
    }

    #[test]
    fn test_new_tree() {
        let tree = SparseMerkleTree::<32, Keccak256, _>::new(MemoryDb::<32>::default());
        assert_eq!(tree.height(), MAX_DEPTH);
        assert_eq!(
            tree.root(),
            EmptyTree::<32, Keccak256>::zero_root(MAX_DEPTH)
        );
        assert!(tree.db().is_empty());
    }

    #[test]
    fn test_with_config_invalid_height() {
        assert!(matches!(
            Tree::with_config(MemoryDb::default(), TreeConfig::with_height(0)),
            Err(TreeError::InvalidHeight { height: 0, .. })
        ));
    }

    #[test]
    fn test_store_node_and_get_children() {
        let mut tree = tree(4);
        let parent = parent_hash::<32, Sha256>(&[1; 32], &[2; 32]);
        assert_eq!(
            tree.get_children(&parent).unwrap(),
            (Slot::ImplicitZero, Slot::ImplicitZero)
        );
        tree.store_node(&parent, [1; 32], [2; 32]).unwrap();
        assert_eq!(
            tree.get_children(&parent).unwrap(),
            (Slot::Materialized([1; 32]), Slot::Materialized([2; 32]))
        );
        assert_eq!(tree.db().len(), 2);
        // same parent from the same children is a no-op in effect
        tree.store_node(&parent, [1; 32], [2; 32]).unwrap();
        assert_eq!(tree.db().len(), 2);
    }

    #[test]
    fn test_zero_root_bounds() {
        let tree = tree(8);
        assert_eq!(tree.zero_root(0), Some([0; 32]));
        assert_eq!(
            tree.zero_root(MAX_DEPTH),
            Some(EmptyTree::<32, Sha256>::zero_root(MAX_DEPTH))
        );
        assert_eq!(tree.zero_root(MAX_DEPTH + 1), None);
    }

    #[test]
    fn test_compressed_proof() {
        let mut tree = tree(12);
        tree.update(b"a", 0x0a0).unwrap();
        tree.update(b"b", 0x0a1).unwrap();
        let compressed = tree.compressed_proof(0x0a0).unwrap();
        assert_eq!(compressed.bits().len(), 12);
        assert_eq!(compressed.siblings(), &[leaf_hash::<32, Sha256>(b"b")]);
        let proof = tree.decompress_proof(&compressed).unwrap();
        assert_eq!(proof, tree.merkle_proof(0x0a0).unwrap());

        let mut other =
            Tree::with_config(MemoryDb::default(), TreeConfig::with_height(16)).unwrap();
        other.update(b"a", 0x0a0).unwrap();
        assert_eq!(
            other.decompress_proof(&compressed).unwrap_err(),
            TreeError::InvalidSiblingCount {
                expected: 16,
                got: 12
            }
        );
    }

    #[test]
    fn test_siblings_of_empty_tree_are_zero_subtrees() {
        let tree = tree(8);
        let siblings = tree.get_siblings(200).unwrap();
        assert_eq!(siblings.len(), 8);
        for (level, sibling) in siblings.iter().enumerate() {
            assert_eq!(Some(*sibling), tree.zero_root(level));
        }
    }

    #[test]
    fn test_update_leaf_and_get_leaf() {
        let mut tree = tree(8);
        tree.update_leaf([7; 32], 42).unwrap();
        assert_eq!(tree.get_leaf(42).unwrap(), [7; 32]);
        assert_eq!(tree.get_leaf(43).unwrap(), [0; 32]);
        // one branch per level, two slots per branch
        assert_eq!(tree.db().len(), 16);
    }

    #[test]
    fn test_update_hashes_data() {
        let mut tree = tree(4);
        tree.update(b"hello", 3).unwrap();
        assert_eq!(
            tree.get_leaf(3).unwrap(),
            leaf_hash::<32, Sha256>(b"hello")
        );
    }

    #[test]
    fn test_update_out_of_range_path() {
        let mut tree = tree(4);
        let root = tree.root();
        assert_eq!(
            tree.update_leaf([1; 32], 16).unwrap_err(),
            TreeError::PathOutOfRange { path: 16, height: 4 }
        );
        assert_eq!(tree.root(), root);
        assert!(tree.db().is_empty());
    }

    #[test]
    fn test_store_leaf_sibling_count() {
        let mut tree = tree(4);
        assert_eq!(
            tree.store_leaf([1; 32], 0, &[[0; 32]; 3]).unwrap_err(),
            TreeError::InvalidSiblingCount {
                expected: 4,
                got: 3
            }
        );
        assert_eq!(
            tree.store_leaf([1; 32], 0, &[[0; 32]; 5]).unwrap_err(),
            TreeError::InvalidSiblingCount {
                expected: 4,
                got: 5
            }
        );
        assert!(tree.db().is_empty());
    }

    #[test]
    fn test_store_trusts_supplied_siblings() {
        let mut tree = tree(2);
        let siblings = [[5; 32], [6; 32]];
        tree.store(b"data", 0, &siblings).unwrap();
        let leaf = leaf_hash::<32, Sha256>(b"data");
        let lower = parent_hash::<32, Sha256>(&leaf, &[5; 32]);
        assert_eq!(tree.root(), parent_hash::<32, Sha256>(&lower, &[6; 32]));
        assert_eq!(tree.get_siblings(0).unwrap(), siblings.to_vec());
    }

    #[test]
    fn test_verify_and_store_rejects_without_writes() {
        let mut tree = tree(3);
        tree.update(b"a", 1).unwrap();
        let root = tree.root();
        let slots = tree.db().len();
        let mut siblings = tree.get_siblings(1).unwrap();
        siblings[1] = [0xff; 32];
        assert!(matches!(
            tree.verify_and_store(b"a", 1, &siblings).unwrap_err(),
            TreeError::InvalidMerkleProof { .. }
        ));
        assert_eq!(tree.root(), root);
        assert_eq!(tree.db().len(), slots);
    }

    #[test]
    fn test_snapshot_round_trip() {
        let mut tree = tree(6);
        tree.update(b"x", 9).unwrap();
        let snapshot = tree.snapshot();
        assert_eq!(snapshot, TreeSnapshot::new(tree.root(), 6));
        let leaf = tree.get_leaf(9).unwrap();
        let db = tree.into_db();
        let rehydrated = Tree::from_snapshot(db, snapshot).unwrap();
        assert_eq!(rehydrated.root(), snapshot.root);
        assert_eq!(rehydrated.get_leaf(9).unwrap(), leaf);
    }

    #[test]
    fn test_from_snapshot_invalid_height() {
        assert!(matches!(
            Tree::from_snapshot(MemoryDb::default(), TreeSnapshot::new([0; 32], MAX_DEPTH + 1)),
            Err(TreeError::InvalidHeight { .. })
        ));
    }

    #[test]
    fn test_full_height_tree_accepts_max_path() {
        let mut tree = SparseMerkleTree::<32, Keccak256, _>::new(MemoryDb::<32>::default());
        tree.update_leaf([1; 32], u64::MAX).unwrap();
        assert_eq!(tree.get_leaf(u64::MAX).unwrap(), [1; 32]);
        assert_eq!(tree.get_leaf(0).unwrap(), [0; 32]);
    }
}
