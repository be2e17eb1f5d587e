use bytes::{Buf, Bytes};
use std::io::IoSlice;

use super::{BufferSequence, Cat, Consuming, Iter};

type Seq = Vec<&'static [u8]>;

fn naive(seqs: &[&Seq]) -> Vec<u8> {
    seqs.iter().flat_map(|seq| seq.iter()).flat_map(|span| span.iter()).copied().collect()
}

/// Walk forward with the cursor, from `begin` to `end`.
fn forward<'a, T: super::Sequences>(cat: &'a Cat<T>) -> Vec<&'a [u8]> {
    let mut spans = Vec::new();
    let mut it = cat.begin();
    while it != cat.end() {
        spans.push(it.get());
        it.move_next();
    }
    spans
}

#[test]
fn test_flatten() {
    macro_rules! test {
        ($(($($seq:expr),*)),* $(,)?) => {$(
            let seqs: Vec<Seq> = vec![$($seq.to_vec()),*];
            let cat = Cat::new(($($seq.to_vec(),)*));
            let spans = forward(&cat);

            assert!(spans.iter().all(|s| !s.is_empty()));
            assert_eq!(spans.concat(), naive(&seqs.iter().collect::<Vec<_>>()));
            assert_eq!(cat.spans().collect::<Vec<_>>(), spans);
            assert_eq!(cat.byte_len(), spans.iter().map(|s| s.len()).sum::<usize>());
        )*};
    }

    const E: &[u8] = b"";

    test! {
        // all empty
        ([E], [E]),
        ([E; 0], [E; 0], [E; 0]),
        // leading empty
        ([E, E], [&b"ab"[..]]),
        ([E; 0], [E], [&b"a"[..], &b"b"[..]]),
        // trailing empty
        ([&b"ab"[..]], [E, E]),
        ([&b"a"[..], E], [E; 0], [E]),
        // interior empty
        ([&b"a"[..]], [E, E], [&b"b"[..]]),
        ([&b"a"[..], E, &b"b"[..]], [E; 0], [E, &b"c"[..], E], [&b"d"[..]]),
        // nothing empty
        ([&b"GET "[..]], [&b"/"[..]], [&b" HTTP/1.1"[..]], [&b"\r\n"[..]]),
    }
}

#[test]
fn test_flatten_random() {
    // xorshift, deterministic
    let mut state = 0x2545_f491_4f6c_dd1du64;
    let mut rand = move |n: u64| {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        state % n
    };

    const POOL: [&[u8]; 5] = [b"", b"", b"a", b"bc", b"def"];

    for _ in 0..500 {
        let mut seqs: [Seq; 4] = Default::default();
        for seq in &mut seqs {
            for _ in 0..rand(4) {
                seq.push(POOL[rand(POOL.len() as u64) as usize]);
            }
        }

        let expected = naive(&seqs.iter().collect::<Vec<_>>());
        let [a, b, c, d] = seqs;
        let cat = Cat::new((a, b, c, d));

        let spans = forward(&cat);
        assert!(spans.iter().all(|s| !s.is_empty()));
        assert_eq!(spans.concat(), expected);

        let mut back = cat.spans().rev().collect::<Vec<_>>();
        back.reverse();
        assert_eq!(back, spans);
    }
}

#[test]
fn test_bidirectional() {
    let cat = Cat::new((
        vec![&b"a"[..], &b""[..], &b"bc"[..]],
        [&b""[..]],
        Bytes::from_static(b"def"),
        [&b"g"[..], &b""[..]],
    ));

    let spans = forward(&cat);
    assert_eq!(spans, [&b"a"[..], &b"bc"[..], &b"def"[..], &b"g"[..]]);

    let mut it = cat.end();
    let mut back = Vec::new();
    for _ in 0..spans.len() {
        it.move_prev();
        back.push(it.get());
    }
    assert_eq!(it, cat.begin());
    back.reverse();
    assert_eq!(back, spans);

    // walk forward and back from the middle
    let mut it = cat.begin();
    it.move_next();
    it.move_next();
    assert_eq!(it.get(), b"def");
    it.move_prev();
    assert_eq!(it.get(), b"bc");
    it.move_next();
    it.move_next();
    it.move_next();
    assert!(it.is_end());
    assert_eq!(it, cat.end());

    // both ends of `Spans`
    let mut iter = cat.spans();
    assert_eq!(iter.next(), Some(&b"a"[..]));
    assert_eq!(iter.next_back(), Some(&b"g"[..]));
    assert_eq!(iter.next_back(), Some(&b"def"[..]));
    assert_eq!(iter.next(), Some(&b"bc"[..]));
    assert_eq!(iter.next(), None);
    assert_eq!(iter.next_back(), None);
}

#[test]
fn test_iter_eq() {
    let cat = Cat::new((&b""[..], &b""[..]));
    assert_eq!(cat.begin(), cat.end());
    assert!(cat.begin().is_end());

    let other = Cat::new((&b""[..], &b""[..]));
    assert_ne!(cat.end(), other.end());
    assert_eq!(Iter::<(&[u8], &[u8])>::default(), Iter::default());
    assert_ne!(Iter::default(), cat.end());
}

// ===== Precondition =====

#[test]
#[should_panic(expected = "precondition violated")]
fn test_default_iter_get() {
    let it = Iter::<(&[u8], &[u8])>::default();
    it.get();
}

#[test]
#[should_panic(expected = "precondition violated")]
fn test_default_iter_move() {
    let mut it = Iter::<(&[u8], &[u8])>::default();
    it.move_next();
}

#[test]
#[should_panic(expected = "precondition violated")]
fn test_end_get() {
    let cat = Cat::new((&b"a"[..], &b"b"[..]));
    cat.end().get();
}

#[test]
#[should_panic(expected = "precondition violated")]
fn test_end_move_next() {
    let cat = Cat::new((&b"a"[..], &b"b"[..]));
    cat.end().move_next();
}

#[test]
#[should_panic(expected = "precondition violated")]
fn test_begin_move_prev() {
    let cat = Cat::new((&b""[..], &b"a"[..]));
    cat.begin().move_prev();
}

#[test]
#[should_panic(expected = "precondition violated")]
fn test_leaf_past_end() {
    let seq = vec![&b"a"[..]];
    seq.next_pos(seq.end_pos());
}

// ===== Consuming =====

#[test]
fn test_consuming() {
    let mut bufs = Consuming::new(Cat::new((
        Bytes::from_static(b"HTTP/1.1 200 \r\n\r\n"),
        [&b""[..], &b"ab"[..]],
        &b"cde"[..],
    )));
    assert_eq!(bufs.remaining(), 22);

    bufs.consume(16);
    assert_eq!(bufs.spans().collect::<Vec<_>>(), [&b"\n"[..], &b"ab"[..], &b"cde"[..]]);

    bufs.consume(2);
    assert_eq!(bufs.spans().collect::<Vec<_>>(), [&b"b"[..], &b"cde"[..]]);
    assert_eq!(bufs.remaining(), 4);

    bufs.consume(0);
    assert_eq!(bufs.remaining(), 4);

    bufs.consume(4);
    assert!(bufs.is_empty());
    assert_eq!(bufs.spans().next(), None);
    bufs.consume(0);
}

#[test]
fn test_consuming_buf() {
    let mut bufs = Consuming::new(vec![&b""[..], &b"abc"[..], &b""[..], &b"de"[..]]);
    assert_eq!(Buf::remaining(&bufs), 5);
    assert_eq!(bufs.chunk(), b"abc");

    let mut slots = [IoSlice::new(&[]); 4];
    assert_eq!(bufs.chunks_vectored(&mut slots), 2);
    assert_eq!(&*slots[1], b"de");

    bufs.advance(2);
    assert_eq!(bufs.chunk(), b"c");
    assert_eq!(bufs.copy_to_bytes(3), &b"cde"[..]);
    assert!(!bufs.has_remaining());
    assert_eq!(bufs.chunk(), b"");
}

#[test]
#[should_panic(expected = "precondition violated")]
fn test_consuming_overflow() {
    let mut bufs = Consuming::new(&b"ab"[..]);
    bufs.consume(3);
}
