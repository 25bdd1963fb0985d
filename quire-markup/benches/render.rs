use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use quire_markup::{MarkdownConverter, ProcessorChain, Renderer};

const POST_SMALL: &str = r"# Short note

A paragraph with `inline code` and an image:

![Diagram](/media/diagram.png)
";

const POST_LARGE: &str = r#"# Deploying the blog

Intro paragraph with **bold**, *italic* and `code`.
A second line that becomes a hard break.

## Checklist

- [x] build assets
- [ ] run migrations
- [ ] restart workers

## Versions

| Component | Version | Notes |
|-----------|---------|-------|
| nginx     | 1.27    | proxy |
| postgres  | 17      | db    |
| redis     | 7.4     | cache |

> [!warning]
>
> Restarting workers drops in-flight jobs.

> Plain quotation from someone clever.

```python
def handler(event):
    return {"status": 200}
```

```
#!/bin/bash
systemctl restart app
```

```mermaid
graph LR
  A[client] --> B[nginx] --> C[app]
```

![Architecture](/media/arch.png){: .shadow}

See the footnote.[^1]

[^1]: Written on a Tuesday.
"#;

fn bench_render(c: &mut Criterion) {
  let mut group = c.benchmark_group("render");
  let renderer = Renderer::new();

  for (name, source) in [("small", POST_SMALL), ("large", POST_LARGE)] {
    group.bench_with_input(BenchmarkId::new("full", name), &source, |b, md| {
      b.iter(|| renderer.render(black_box(md)));
    });
  }

  group.finish();
}

fn bench_stages(c: &mut Criterion) {
  let mut group = c.benchmark_group("stages");
  let converter = MarkdownConverter::new();
  let chain = ProcessorChain::standard();
  let converted = converter.convert(POST_LARGE);

  group.bench_function("convert", |b| {
    b.iter(|| converter.convert(black_box(POST_LARGE)));
  });

  group.bench_function("chain", |b| {
    b.iter(|| chain.process(black_box(&converted)));
  });

  group.finish();
}

criterion_group!(benches, bench_render, bench_stages);
criterion_main!(benches);
