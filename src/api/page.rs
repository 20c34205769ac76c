//! Upload page served at `/`.
//!
//! Everything is inline so the binary has no static asset directory. The
//! "download ready" flag and the last generated document live in page
//! script state, so each browser tab keeps its own.

pub const UPLOAD_PAGE_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>IDR Justification Builder</title>
  <style>
    * { box-sizing: border-box; margin: 0; padding: 0; }
    body {
      font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', system-ui, sans-serif;
      background: #fafaf9; color: #1c1917;
      max-width: 880px; margin: 0 auto; padding: 32px 24px;
    }
    h1 { font-size: 24px; margin-bottom: 8px; }
    p.lead { color: #78716c; font-size: 14px; margin-bottom: 24px; }
    .uploads { display: grid; gap: 16px; margin-bottom: 24px; }
    .uploads label { display: block; font-weight: 600; font-size: 14px; margin-bottom: 6px; }
    .uploads input { width: 100%; padding: 10px; border: 1px solid #d6d3d1; border-radius: 8px; background: white; }
    .actions { display: flex; gap: 12px; margin-bottom: 24px; }
    .btn {
      padding: 12px 20px; border-radius: 10px; font-size: 15px; font-weight: 500;
      cursor: pointer; border: none; min-height: 44px;
    }
    .btn-primary { background: #1d4ed8; color: white; }
    .btn-secondary { background: white; color: #44403c; border: 1px solid #d6d3d1; }
    .btn:disabled { opacity: 0.5; cursor: not-allowed; }
    .status { margin-bottom: 16px; font-size: 14px; }
    .status.success { color: #16a34a; }
    .status.error { color: #dc2626; }
    #letter {
      background: white; border: 1px solid #e7e5e4; border-radius: 12px;
      padding: 24px; white-space: pre-wrap; line-height: 1.5; display: none;
    }
  </style>
</head>
<body>
  <h1>IDR Justification Builder</h1>
  <p class="lead">Upload the EOB, the medical records and the summary instructions, then run.</p>

  <div class="uploads">
    <div>
      <label for="eob">Explanation of Benefits (PDF or image)</label>
      <input type="file" id="eob" accept="application/pdf,image/*,.txt">
    </div>
    <div>
      <label for="records">Medical records (PDF or image)</label>
      <input type="file" id="records" accept="application/pdf,image/*,.txt">
    </div>
    <div>
      <label for="instructions">Summary instructions (.txt)</label>
      <input type="file" id="instructions" accept=".txt,text/plain">
    </div>
  </div>

  <div class="actions">
    <button class="btn btn-primary" id="btn-run">Run</button>
    <button class="btn btn-secondary" id="btn-download" disabled>Download Word document</button>
  </div>

  <div class="status" id="status"></div>
  <div id="letter"></div>

  <script>
    var btnRun = document.getElementById('btn-run');
    var btnDownload = document.getElementById('btn-download');
    var statusEl = document.getElementById('status');
    var letterEl = document.getElementById('letter');

    var downloadReady = false;
    var lastDocument = null;

    function showStatus(text, type) {
      statusEl.textContent = text;
      statusEl.className = 'status ' + type;
    }

    function escapeHtml(text) {
      return text.replace(/&/g, '&amp;').replace(/</g, '&lt;').replace(/>/g, '&gt;');
    }

    function renderLetter(text) {
      var html = escapeHtml(text)
        .replace(/^## (.*)$/gm, '<strong>$1</strong>')
        .replace(/\*\*(.+?)\*\*/g, '<strong>$1</strong>');
      letterEl.innerHTML = html;
      letterEl.style.display = 'block';
    }

    function setDownloadReady(ready) {
      downloadReady = ready;
      btnDownload.disabled = !ready;
    }

    btnRun.addEventListener('click', function() {
      var formData = new FormData();
      ['eob', 'records', 'instructions'].forEach(function(name) {
        var file = document.getElementById(name).files[0];
        if (file) formData.append(name, file);
      });

      setDownloadReady(false);
      btnRun.disabled = true;
      showStatus('Running...', '');

      fetch('/api/justification', { method: 'POST', body: formData })
        .then(function(resp) {
          return resp.json().then(function(body) { return { ok: resp.ok, body: body }; });
        })
        .then(function(result) {
          btnRun.disabled = false;
          if (!result.ok) {
            var message = (result.body.error && result.body.error.message) || 'Run failed';
            showStatus(message, 'error');
            return;
          }
          lastDocument = result.body;
          renderLetter(result.body.display_text);
          setDownloadReady(true);
          showStatus('Letter generated.', 'success');
        })
        .catch(function() {
          btnRun.disabled = false;
          showStatus('Connection failed.', 'error');
        });
    });

    btnDownload.addEventListener('click', function() {
      if (!downloadReady || !lastDocument) return;
      var raw = atob(lastDocument.docx_base64);
      var bytes = new Uint8Array(raw.length);
      for (var i = 0; i < raw.length; i++) bytes[i] = raw.charCodeAt(i);
      var blob = new Blob([bytes], { type: lastDocument.mime_type });
      var link = document.createElement('a');
      link.href = URL.createObjectURL(blob);
      link.download = lastDocument.filename;
      link.click();
      URL.revokeObjectURL(link.href);
    });
  </script>
</body>
</html>"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_has_three_named_uploads() {
        for id in ["id=\"eob\"", "id=\"records\"", "id=\"instructions\""] {
            assert!(UPLOAD_PAGE_HTML.contains(id), "missing {id}");
        }
    }

    #[test]
    fn download_starts_disabled() {
        assert!(UPLOAD_PAGE_HTML.contains("id=\"btn-download\" disabled"));
        assert!(UPLOAD_PAGE_HTML.contains("/api/justification"));
    }
}
