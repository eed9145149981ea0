use hex_literal::hex;
use sha2::{Digest, Sha512};

use crate::{EmptyTree, Hasher, MemoryDb, SparseMerkleTree, TreeConfig};

impl Hasher<64> for Sha512 {
    fn hash(data: &[u8]) -> [u8; 64] {
        let mut hasher = Sha512::new();
        hasher.update(data);
        hasher.finalize().into()
    }
}

fn tree() -> SparseMerkleTree<64, Sha512, MemoryDb<64>> {
    SparseMerkleTree::with_config(MemoryDb::default(), TreeConfig::with_height(3)).unwrap()
}

#[test]
fn test_empty_tree() {
    let tree = tree();
    assert_eq!(
        tree.root(),
        hex!("2cda554e34ae6323406c8a0d94a2f70d103d023a0b2e882bae62be00d886a81e3a8ed497c0e8e906ce2a936786dcd769e42b93d6c95e27a7bd0f8598fbcb220e")
    );
    assert_eq!(tree.root(), EmptyTree::<64, Sha512>::zero_root(3));
}

#[test]
fn test_insertion() {
    let mut tree = tree();
    tree.update(b"abc", 5).unwrap();
    assert_eq!(
        tree.get_leaf(5).unwrap(),
        hex!("ddaf35a193617abacc417349ae20413112e6fa4e89a97ea20a9eeee64b55d39a2192992a274fc1a836ba3c23a3feebbd454d4423643ce80e2a9ac94fa54ca49f")
    );
    assert_eq!(
        tree.root(),
        hex!("8e09bef2a7071092161148e13d8a031c3c708baf686106ae290547059295241b9e7c6aae514363822f13ea32008c63b327d11a5ac24a00c497052c219c825ce1")
    );
}

#[test]
fn test_proof() {
    let mut tree = tree();
    tree.update(b"abc", 5).unwrap();
    let proof = tree.merkle_proof(5).unwrap();
    proof
        .verify::<Sha512, ()>(5, tree.get_leaf(5).unwrap(), tree.root())
        .unwrap();
    let compressed = proof.compress::<Sha512>();
    assert!(compressed.siblings().is_empty());
    assert_eq!(compressed.decompress::<Sha512, ()>().unwrap(), proof);
}
