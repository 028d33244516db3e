//! 文本分块器
//!
//! 按段落、行、词、字符的优先级把文档切成带重叠的分块。

/// 分隔符层级，靠前者优先
const SEPARATORS: [&str; 3] = ["\n\n", "\n", " "];

/// 递归字符分块器
///
/// 先把文本按分隔符层级拆成不超过 `chunk_size` 的原子片段，再贪心合并，
/// 相邻分块之间保留不超过 `chunk_overlap` 个字符的重叠窗口。
#[derive(Debug, Clone)]
pub struct TextSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl TextSplitter {
    /// 创建分块器，`chunk_overlap` 必须小于 `chunk_size`
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        assert!(chunk_size > 0);
        assert!(chunk_overlap < chunk_size);
        Self {
            chunk_size,
            chunk_overlap,
        }
    }

    /// 把文本切成分块
    pub fn split(&self, text: &str) -> Vec<String> {
        let mut atoms = Vec::new();
        self.atomize(text, 0, &mut atoms);
        self.merge(atoms)
    }

    /// 把文本拆成不超过 chunk_size 的原子片段，保留分隔符以便无损拼接
    fn atomize(&self, text: &str, depth: usize, out: &mut Vec<String>) {
        if text.is_empty() {
            return;
        }

        if char_len(text) <= self.chunk_size {
            out.push(text.to_string());
            return;
        }

        if depth >= SEPARATORS.len() {
            // 字符级硬切，最后的兜底
            let chars: Vec<char> = text.chars().collect();
            for piece in chars.chunks(self.chunk_size) {
                out.push(piece.iter().collect());
            }
            return;
        }

        let separator = SEPARATORS[depth];
        if !text.contains(separator) {
            self.atomize(text, depth + 1, out);
            return;
        }

        for piece in text.split_inclusive(separator) {
            self.atomize(piece, depth + 1, out);
        }
    }

    /// 贪心合并原子片段，块间保留重叠窗口
    fn merge(&self, atoms: Vec<String>) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut window: Vec<String> = Vec::new();
        let mut window_len = 0usize;

        for atom in atoms {
            let atom_len = char_len(&atom);

            if window_len + atom_len > self.chunk_size && !window.is_empty() {
                chunks.push(window.concat());

                // 回退到重叠窗口之内，为下一个分块保留上下文
                while !window.is_empty()
                    && (window_len > self.chunk_overlap
                        || window_len + atom_len > self.chunk_size)
                {
                    let removed = window.remove(0);
                    window_len -= char_len(&removed);
                }
            }

            window_len += atom_len;
            window.push(atom);
        }

        if !window.is_empty() {
            chunks.push(window.concat());
        }

        chunks
            .into_iter()
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .collect()
    }
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_is_single_chunk() {
        let splitter = TextSplitter::new(1000, 200);
        let chunks = splitter.split("a short document");
        assert_eq!(chunks, vec!["a short document".to_string()]);
    }

    #[test]
    fn test_chunks_never_exceed_size() {
        let splitter = TextSplitter::new(50, 10);
        let text = "word ".repeat(200);
        for chunk in splitter.split(&text) {
            assert!(chunk.chars().count() <= 50, "oversized chunk: {:?}", chunk);
        }
    }

    #[test]
    fn test_paragraph_boundaries_preferred() {
        let splitter = TextSplitter::new(40, 0);
        let text = "first paragraph here.\n\nsecond paragraph here.\n\nthird paragraph here.";
        let chunks = splitter.split(text);
        // 每个段落都能装进一个分块，不应在段落中间断开
        assert!(chunks.iter().all(|c| c.contains("paragraph")));
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0], "first paragraph here.");
    }

    #[test]
    fn test_consecutive_chunks_overlap() {
        let splitter = TextSplitter::new(30, 12);
        let text = "alpha beta gamma delta epsilon zeta eta theta iota kappa";
        let chunks = splitter.split(text);
        assert!(chunks.len() >= 2);

        for pair in chunks.windows(2) {
            let tail_word = pair[0].split_whitespace().last().unwrap();
            assert!(
                pair[1].contains(tail_word),
                "no overlap between {:?} and {:?}",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn test_unbroken_text_falls_back_to_characters() {
        let splitter = TextSplitter::new(10, 0);
        let text = "x".repeat(35);
        let chunks = splitter.split(&text);
        assert_eq!(chunks.len(), 4);
        assert!(chunks.iter().all(|c| c.chars().count() <= 10));
    }

    #[test]
    fn test_empty_input_yields_nothing() {
        let splitter = TextSplitter::new(100, 20);
        assert!(splitter.split("").is_empty());
        assert!(splitter.split("   \n\n   ").is_empty());
    }
}
