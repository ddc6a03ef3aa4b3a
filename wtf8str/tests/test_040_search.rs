
use log::info;
use wtf8str::{StringHeap, Wtf8Result};

// cargo test --test test_040_search -- --nocapture
#[test]
fn test_040_search() -> Wtf8Result<()> {
    let _log_handle = test_utils::init_logger();

    let mut heap = StringHeap::new();
    ascii_needles(&mut heap)?;
    empty_needle(&mut heap)?;
    surrogate_needles(&mut heap)?;
    backwards(&mut heap)?;
    Ok(())
}

fn ascii_needles(heap: &mut StringHeap) -> Wtf8Result<()> {
    info!("forward search returns the first hit at or after the start");
    let input = heap.intern(b"abcabcabc")?;
    let needle = heap.intern(b"abc")?;

    assert_eq!(heap.search_forwards(&input, &needle, 0)?, Some(0));
    assert_eq!(heap.search_forwards(&input, &needle, 1)?, Some(3));
    assert_eq!(heap.search_forwards(&input, &needle, 4)?, Some(6));
    assert_eq!(heap.search_forwards(&input, &needle, 7)?, None);

    let missing = heap.intern(b"abd")?;
    assert_eq!(heap.search_forwards(&input, &missing, 0)?, None);

    // Needle longer than the input can never match.
    let long = heap.intern(b"abcabcabcabc")?;
    assert_eq!(heap.search_forwards(&input, &long, 0)?, None);
    Ok(())
}

fn empty_needle(heap: &mut StringHeap) -> Wtf8Result<()> {
    info!("the empty needle matches at the start offset itself");
    let input = heap.intern(b"abc")?;
    let empty = heap.empty();

    for k in 0..=3 {
        assert_eq!(heap.search_forwards(&input, &empty, k)?, Some(k));
        assert_eq!(heap.search_backwards(&input, &empty, k)?, Some(k));
    }
    // Start beyond the end finds nothing forward, clamps backward.
    assert_eq!(heap.search_forwards(&input, &empty, 4)?, None);
    assert_eq!(heap.search_backwards(&input, &empty, 4)?, Some(3));
    Ok(())
}

fn surrogate_needles(heap: &mut StringHeap) -> Wtf8Result<()> {
    info!("search sees the surrogate-pair view of non-BMP content");
    // "a😀b": character offsets are a=0, high=1, low=2, b=3.
    let input = heap.intern("a😀b".as_bytes())?;

    let smiley = heap.intern("😀".as_bytes())?;
    assert_eq!(heap.search_forwards(&input, &smiley, 0)?, Some(1));

    // A lone high surrogate needle matches the first half of the pair.
    let hi = heap.intern(&[0xED, 0xA0, 0xBD])?;
    assert_eq!(heap.search_forwards(&input, &hi, 0)?, Some(1));

    // A lone low surrogate needle matches the second half.
    let lo = heap.intern(&[0xED, 0xB8, 0x80])?;
    assert_eq!(heap.search_forwards(&input, &lo, 0)?, Some(2));
    assert_eq!(heap.search_forwards(&input, &lo, 3)?, None);

    // "low + b" spans out of the pair's middle.
    let mixed = heap.intern(&[0xED, 0xB8, 0x80, 0x62])?;
    assert_eq!(heap.search_forwards(&input, &mixed, 0)?, Some(2));
    Ok(())
}

fn backwards(heap: &mut StringHeap) -> Wtf8Result<()> {
    info!("backward search returns the last hit at or before the start");
    let input = heap.intern(b"abcabcabc")?;
    let needle = heap.intern(b"abc")?;

    assert_eq!(heap.search_backwards(&input, &needle, 8)?, Some(6));
    assert_eq!(heap.search_backwards(&input, &needle, 6)?, Some(6));
    assert_eq!(heap.search_backwards(&input, &needle, 5)?, Some(3));
    assert_eq!(heap.search_backwards(&input, &needle, 0)?, Some(0));

    let missing = heap.intern(b"cba")?;
    assert_eq!(heap.search_backwards(&input, &missing, 8)?, None);

    // Non-BMP: last smiley wins when searching from the end.
    let input = heap.intern("😀x😀".as_bytes())?;
    let smiley = heap.intern("😀".as_bytes())?;
    assert_eq!(heap.search_backwards(&input, &smiley, 5)?, Some(3));
    assert_eq!(heap.search_backwards(&input, &smiley, 2)?, Some(0));
    Ok(())
}
