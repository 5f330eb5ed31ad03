use dynstring::DynString;

fn stats(tag: &str, s: &DynString) {
    println!("{tag}: {:?} len={} available={} capacity={}", s, s.len(), s.available(), s.capacity());
}

fn main() {
    let s = DynString::from_slice(b"hello");
    stats("from_slice", &s);

    let s = s.append(b",world");
    stats("append", &s);

    let s = s.make_room(100);
    stats("make_room(100)", &s);

    let s = s.shrink_to_fit();
    stats("shrink_to_fit", &s);

    let s = s.range(0, 4);
    stats("range(0,4)", &s);

    let s = s.grow_zeroed(8);
    stats("grow_zeroed(8)", &s);

    let s = s.clear();
    stats("clear", &s);

    let s = s.append_fmt(format_args!("{} + {} = {}", 2, 2, 2 + 2));
    stats("append_fmt", &s);

    let trimmed = DynString::from_slice(b"  padded  ").trim(b" ");
    stats("trim", &trimmed);

    let tokens = DynString::split(b"a,b,c", b",");
    println!("split: {:?}", tokens);

    let joined = DynString::from_slice(b" | ").join(&tokens);
    stats("join", &joined);

    let args = DynString::split_args(b"set key \"hello\\x20world\"").unwrap();
    println!("split_args: {:?}", args);
}
