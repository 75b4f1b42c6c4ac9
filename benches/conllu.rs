use conllmatch::{Matcher, parse_document, parse_rule, search};
use divan::{Bencher, black_box};

fn main() {
    divan::main();
}

const SENTENCE: &str = "\
# text = The quick brown fox jumps over the lazy dog.
1\tThe\tthe\tDET\tDT\tDefinite=Def|PronType=Art\t4\tdet\t_\t_
2\tquick\tquick\tADJ\tJJ\tDegree=Pos\t4\tamod\t_\t_
3\tbrown\tbrown\tADJ\tJJ\tDegree=Pos\t4\tamod\t_\t_
4\tfox\tfox\tNOUN\tNN\tNumber=Sing\t5\tnsubj\t_\t_
5\tjumps\tjump\tVERB\tVBZ\tMood=Ind|Number=Sing|Person=3|Tense=Pres\t0\troot\t_\t_
6\tover\tover\tADP\tIN\t_\t9\tcase\t_\t_
7\tthe\tthe\tDET\tDT\tDefinite=Def|PronType=Art\t9\tdet\t_\t_
8\tlazy\tlazy\tADJ\tJJ\tDegree=Pos\t9\tamod\t_\t_
9\tdog\tdog\tNOUN\tNN\tNumber=Sing\t5\tobl\t_\tSpaceAfter=No
10\t.\t.\tPUNCT\t.\t_\t5\tpunct\t_\t_

";

fn corpus(sentences: usize) -> String {
    SENTENCE.repeat(sentences)
}

/// Parse documents of increasing size
#[divan::bench(args = [1, 100, 1000])]
fn parse(bencher: Bencher, sentences: usize) {
    let text = corpus(sentences);
    bencher.bench_local(|| parse_document(black_box(&text)));
}

/// Search a parsed document with a rule
#[divan::bench]
fn search_nouns(bencher: Bencher) {
    let doc = parse_document(&corpus(100));
    let matcher: Matcher = parse_rule(r#"[upostag={"NOUN", "PROPN"}, feats.Number="Sing"]"#).unwrap();
    bencher.bench_local(|| search(black_box(&doc), black_box(&matcher)).unwrap());
}
