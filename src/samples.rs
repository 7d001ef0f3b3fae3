//! Built-in public-domain verse fragments, used by the viewer's "next
//! fragment" key and by demos.

use crate::types::FragmentDescriptor;

/// `(tray id, text, source)`
pub const SAMPLE_FRAGMENTS: [(&str, &str, &str); 32] = [
    ("f1", "明月", "唐诗"),
    ("f2", "松间照", "唐诗"),
    ("f3", "清泉", "唐诗"),
    ("f4", "石上流", "唐诗"),
    ("f5", "红豆", "宋词"),
    ("f6", "生南国", "宋词"),
    ("f7", "春来", "宋词"),
    ("f8", "发几枝", "宋词"),
    ("f9", "细雨", "宋词"),
    ("f10", "湿花红", "宋词"),
    ("f11", "微风", "宋词"),
    ("f12", "拂柳绿", "宋词"),
    ("f13", "夜来", "唐诗"),
    ("f14", "风雨声", "唐诗"),
    ("f15", "花落", "唐诗"),
    ("f16", "知多少", "唐诗"),
    ("f17", "青山", "宋词"),
    ("f18", "遮不住", "宋词"),
    ("f19", "毕竟", "宋词"),
    ("f20", "东流去", "宋词"),
    ("f21", "不知", "元曲"),
    ("f22", "相思", "元曲"),
    ("f23", "苦", "元曲"),
    ("f24", "归来", "元曲"),
    ("f25", "蓦然回首", "宋词"),
    ("f26", "那人", "宋词"),
    ("f27", "却在", "宋词"),
    ("f28", "灯火阑珊处", "宋词"),
    ("f29", "莫愁", "唐诗"),
    ("f30", "前路", "唐诗"),
    ("f31", "无知己", "唐诗"),
    ("f32", "天下谁人不识君", "唐诗"),
];

/// Sample `index`, wrapping around the list.
pub fn sample(index: usize) -> FragmentDescriptor {
    let (id, text, source) = SAMPLE_FRAGMENTS[index % SAMPLE_FRAGMENTS.len()];
    FragmentDescriptor::new(id, text, source)
}

pub fn all_samples() -> Vec<FragmentDescriptor> {
    (0..SAMPLE_FRAGMENTS.len()).map(sample).collect()
}
